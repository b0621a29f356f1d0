use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tenancy_core::{TaskLocalTenantContextAccessor, TenantContext, TenantContextAccessor};

/// The tenant resolved for this request, if any.
///
/// Reads the context the tenancy layer placed in the request extensions and
/// falls back to the ambient accessor of the current flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentTenant(pub Option<TenantContext>);

impl CurrentTenant {
    pub fn id(&self) -> Option<&str> {
        self.0.as_ref().map(|ctx| ctx.id.as_str())
    }
}

impl<S> FromRequestParts<S> for CurrentTenant
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .or_else(|| TaskLocalTenantContextAccessor::new().get());
        Ok(Self(context))
    }
}
