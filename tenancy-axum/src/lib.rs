//! tenancy-axum: Axum integration for multi-tenancy.
//!
//! Resolves the tenant of each request with an ordered chain of detection
//! strategies and makes it available to handlers through the ambient
//! accessor, the request extensions and the [`CurrentTenant`] extractor.

pub mod detection;
pub mod middleware;
pub mod options;
mod error;
mod extract;
mod trace;

pub use detection::{FromRequestHeaderStrategy, FromRequestHostStrategy, TenantDetectionStrategy};
pub use error::TenancyAxumError;
pub use extract::CurrentTenant;
pub use middleware::{
    Detection, DisableMultiTenancy, RequestTenancy, RequestTenancyLayer, RequestTenancyService,
};
pub use options::{RequestTenancyBuilder, RequestTenancyOptions, DEFAULT_ACTIVITY_TAG};
pub use trace::TenancyMakeSpan;
