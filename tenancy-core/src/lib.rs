//! tenancy-core: framework-agnostic multi-tenancy.
//!
//! - [`Tenant`] / [`TenantContext`]: the stored record and the per-operation snapshot
//! - [`TenantContextAccessor`]: ambient "current tenant" for a logical flow
//! - [`TenantStore`] / [`TenantManager`]: tenant management, with an in-memory store
//!
//! Transport adapters (see `tenancy-axum`) decide which tenant an inbound
//! operation belongs to and install it through the accessor.

pub mod config;
pub mod context;
pub mod errors;
pub mod manager;
pub mod memory;
pub mod registry;
pub mod store;
pub mod tenant;

pub use config::{TenancyConfig, TenancyConfigSnapshot};
pub use context::{TaskLocalTenantContextAccessor, TenantContextAccessor};
pub use errors::{ErrorKind, TenancyError, TenancyResult};
pub use manager::{DefaultTenantManager, TenantManager};
pub use memory::InMemoryTenantStore;
pub use registry::{DependencyRegistry, FromDependencies};
pub use store::TenantStore;
pub use tenant::{Tenant, TenantContext};
