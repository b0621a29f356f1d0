//! Tenant detection strategies.
//!
//! A strategy looks at the head of an inbound request and either names a
//! tenant or passes. Strategies are tried in the order they were configured
//! and the first one that names a tenant wins.

use async_trait::async_trait;
use axum::http::request::Parts;

mod header;
mod host;

pub use header::FromRequestHeaderStrategy;
pub use host::FromRequestHostStrategy;

#[async_trait]
pub trait TenantDetectionStrategy: Send + Sync {
    /// `Ok(None)` when this strategy cannot tell. An `Err` aborts detection
    /// for the request; later strategies are not consulted.
    async fn try_detect(&self, parts: &Parts) -> anyhow::Result<Option<String>>;

    /// Name used in log events.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }
}

fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
