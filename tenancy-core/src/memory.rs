use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::errors::{TenancyError, TenancyResult};
use crate::store::TenantStore;
use crate::tenant::Tenant;

/// In-memory tenant store for tests, demos and single-node deployments.
///
/// Each instance owns its own map; nothing is shared between stores.
#[derive(Debug, Default)]
pub struct InMemoryTenantStore {
    tenants: DashMap<String, Tenant>,
}

impl InMemoryTenantStore {
    pub fn new() -> Self {
        Self {
            tenants: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

#[async_trait]
impl TenantStore for InMemoryTenantStore {
    async fn add(&self, tenant: Tenant) -> TenancyResult<()> {
        match self.tenants.entry(tenant.id().to_string()) {
            Entry::Occupied(_) => Err(TenancyError::duplicate_tenant(tenant.id())),
            Entry::Vacant(slot) => {
                tracing::debug!(tenant = %tenant.id(), "tenant added");
                slot.insert(tenant);
                Ok(())
            }
        }
    }

    async fn update(&self, tenant: Tenant) -> TenancyResult<()> {
        match self.tenants.get_mut(tenant.id()) {
            Some(mut stored) => {
                tracing::debug!(tenant = %tenant.id(), "tenant updated");
                *stored = tenant;
                Ok(())
            }
            None => Err(TenancyError::tenant_not_found(tenant.id())),
        }
    }

    async fn remove(&self, id: &str) -> TenancyResult<()> {
        if self.tenants.remove(id).is_some() {
            tracing::debug!(tenant = %id, "tenant removed");
        }
        Ok(())
    }

    async fn list_all(&self) -> TenancyResult<Vec<Tenant>> {
        Ok(self.tenants.iter().map(|entry| entry.value().clone()).collect())
    }
}
