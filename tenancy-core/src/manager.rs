use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::TenancyResult;
use crate::store::TenantStore;
use crate::tenant::Tenant;

/// Management API over a [`TenantStore`].
#[async_trait]
pub trait TenantManager: Send + Sync {
    async fn add(&self, tenant: Tenant) -> TenancyResult<()>;

    async fn remove(&self, id: &str) -> TenancyResult<()>;

    /// The tenant with `id`, or `None`.
    async fn get(&self, id: &str) -> TenancyResult<Option<Tenant>>;

    async fn list_all(&self) -> TenancyResult<Vec<Tenant>>;
}

/// Delegates to the store; store errors are returned as-is.
#[derive(Clone)]
pub struct DefaultTenantManager {
    store: Arc<dyn TenantStore>,
}

impl DefaultTenantManager {
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TenantManager for DefaultTenantManager {
    async fn add(&self, tenant: Tenant) -> TenancyResult<()> {
        self.store.add(tenant).await
    }

    async fn remove(&self, id: &str) -> TenancyResult<()> {
        self.store.remove(id).await
    }

    // Reads the full list on every call; stores have no keyed lookup.
    async fn get(&self, id: &str) -> TenancyResult<Option<Tenant>> {
        let tenants = self.store.list_all().await?;
        Ok(tenants.into_iter().find(|t| t.id() == id))
    }

    async fn list_all(&self) -> TenancyResult<Vec<Tenant>> {
        self.store.list_all().await
    }
}
