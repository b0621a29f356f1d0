use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tenancy_core::TenancyError;

#[derive(Debug)]
pub struct TenancyAxumError(pub TenancyError);

impl From<TenancyError> for TenancyAxumError {
    fn from(e: TenancyError) -> Self {
        Self(e)
    }
}

impl IntoResponse for TenancyAxumError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.to_json())).into_response()
    }
}
