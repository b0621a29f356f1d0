use async_trait::async_trait;

use crate::errors::TenancyResult;
use crate::tenant::Tenant;

/// System of record for [`Tenant`]s.
///
/// Implementations must make `add` atomic per id: when several callers add
/// the same id concurrently exactly one succeeds and the others fail with
/// `DuplicateTenant`.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Insert a new tenant. Fails with `DuplicateTenant` if the id is taken.
    async fn add(&self, tenant: Tenant) -> TenancyResult<()>;

    /// Replace the stored record for `tenant.id()`. Fails with `TenantNotFound`.
    async fn update(&self, tenant: Tenant) -> TenancyResult<()>;

    /// Remove a tenant. Removing an unknown id is not an error.
    async fn remove(&self, id: &str) -> TenancyResult<()>;

    /// All stored tenants, in no particular order.
    async fn list_all(&self) -> TenancyResult<Vec<Tenant>>;
}
