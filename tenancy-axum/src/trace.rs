use axum::http::Request;
use tower_http::trace::MakeSpan;
use tracing::Span;

/// `MakeSpan` for `TraceLayer` that leaves an empty `tenant` field on the
/// request span for the tenancy layer to record into.
///
/// Use it when the tag name is left at its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct TenancyMakeSpan;

impl<B> MakeSpan<B> for TenancyMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            tenant = tracing::field::Empty,
        )
    }
}
