//! Request tenancy middleware.
//!
//! [`RequestTenancyLayer`] runs every request in its own tenant flow and
//! resolves the tenant before the request reaches the handler:
//!
//! 1. requests opted out (see [`DisableMultiTenancy`]) pass straight through;
//! 2. a tenant already present in the flow is a pipeline error;
//! 3. so is an options value without strategies;
//! 4. strategies run one after another until one names a tenant;
//! 5. the tenant is installed in the accessor, the request extensions and
//!    the current span.
//!
//! Errors from steps 2-4 are answered with a JSON error body; the handler
//! does not run.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::request::Parts;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use tenancy_core::{
    TaskLocalTenantContextAccessor, TenancyError, TenancyResult, TenantContext,
    TenantContextAccessor,
};
use tower::{Layer, Service};

use crate::options::RequestTenancyOptions;
use crate::TenancyAxumError;

/// Opt-out marker. When present in the request extensions no detection runs.
///
/// Routes can also be opted out by pattern with
/// [`disable_for_route`](crate::RequestTenancyBuilder::disable_for_route)
/// and [`disable_for_group`](crate::RequestTenancyBuilder::disable_for_group).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisableMultiTenancy;

/// A successful detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub tenant_id: String,
    pub strategy: String,
}

/// The detection gate, independent of the tower plumbing.
pub struct RequestTenancy {
    options: Arc<RequestTenancyOptions>,
    accessor: Arc<dyn TenantContextAccessor>,
}

impl RequestTenancy {
    pub fn new(options: RequestTenancyOptions) -> Self {
        Self::with_accessor(options, Arc::new(TaskLocalTenantContextAccessor::new()))
    }

    pub fn with_accessor(
        options: RequestTenancyOptions,
        accessor: Arc<dyn TenantContextAccessor>,
    ) -> Self {
        Self {
            options: Arc::new(options),
            accessor,
        }
    }

    pub fn options(&self) -> &RequestTenancyOptions {
        &self.options
    }

    pub fn accessor(&self) -> &Arc<dyn TenantContextAccessor> {
        &self.accessor
    }

    pub fn is_disabled(&self, parts: &Parts) -> bool {
        if parts.extensions.get::<DisableMultiTenancy>().is_some() {
            return true;
        }

        let path = parts
            .extensions
            .get::<MatchedPath>()
            .map(MatchedPath::as_str)
            .unwrap_or_else(|| parts.uri.path());

        self.options.is_disabled_for(path)
    }

    /// Guard checks plus the strategy chain. Does not touch the accessor.
    pub async fn detect(&self, parts: &Parts) -> TenancyResult<Option<Detection>> {
        if self.accessor.get().is_some() {
            return Err(TenancyError::AlreadySet);
        }

        let strategies = self.options.strategies();
        if strategies.is_empty() {
            return Err(TenancyError::NoStrategiesConfigured);
        }

        for strategy in strategies {
            let detected = strategy
                .try_detect(parts)
                .await
                .map_err(|source| TenancyError::strategy(strategy.name(), source))?;

            if let Some(tenant_id) = detected.filter(|id| !id.is_empty()) {
                tracing::debug!(tenant_id = %tenant_id, strategy = %strategy.name(), "tenant detected");
                return Ok(Some(Detection {
                    tenant_id,
                    strategy: strategy.name().to_string(),
                }));
            }
        }

        tracing::debug!("unable to detect tenant");
        Ok(None)
    }

    /// Detect and install the tenant for the current flow.
    pub async fn apply(&self, parts: &mut Parts) -> TenancyResult<Option<TenantContext>> {
        let Some(detection) = self.detect(parts).await? else {
            return Ok(None);
        };

        // No-op unless the current span declares the field.
        tracing::Span::current().record(
            self.options.activity_tag_name(),
            tracing::field::display(&detection.tenant_id),
        );

        let context = TenantContext::from_id(detection.tenant_id);
        self.accessor.set(Some(context.clone()));
        parts.extensions.insert(context.clone());
        Ok(Some(context))
    }
}

/// Clears the installed tenant when the request completes or is dropped.
struct ClearOnDrop(Arc<RequestTenancy>);

impl Drop for ClearOnDrop {
    fn drop(&mut self) {
        self.0.accessor.set(None);
    }
}

#[derive(Clone)]
pub struct RequestTenancyLayer {
    tenancy: Arc<RequestTenancy>,
}

impl RequestTenancyLayer {
    pub fn new(options: RequestTenancyOptions) -> Self {
        Self::from_tenancy(RequestTenancy::new(options))
    }

    pub fn from_tenancy(tenancy: RequestTenancy) -> Self {
        Self {
            tenancy: Arc::new(tenancy),
        }
    }
}

impl<S> Layer<S> for RequestTenancyLayer {
    type Service = RequestTenancyService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestTenancyService {
            inner,
            tenancy: Arc::clone(&self.tenancy),
        }
    }
}

#[derive(Clone)]
pub struct RequestTenancyService<S> {
    inner: S,
    tenancy: Arc<RequestTenancy>,
}

impl<S> Service<Request<Body>> for RequestTenancyService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // The clone may not be ready; keep the one that was polled.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let tenancy = Arc::clone(&self.tenancy);

        Box::pin(TaskLocalTenantContextAccessor::scope(async move {
            let (mut parts, body) = req.into_parts();

            if tenancy.is_disabled(&parts) {
                tracing::debug!(path = %parts.uri.path(), "endpoint is marked to skip tenant detection");
                return inner.call(Request::from_parts(parts, body)).await;
            }

            let applied = match tenancy.apply(&mut parts).await {
                Ok(applied) => applied,
                Err(err) => {
                    tracing::error!(error = %err, "request tenancy failed");
                    return Ok(TenancyAxumError::from(err).into_response());
                }
            };

            let _clear = applied.map(|_| ClearOnDrop(Arc::clone(&tenancy)));

            inner.call(Request::from_parts(parts, body)).await
        }))
    }
}
