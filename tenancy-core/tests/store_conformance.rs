use std::sync::Arc;

use futures::future::join_all;
use tenancy_core::{InMemoryTenantStore, Tenant, TenancyError, TenantStore};

/// Behaviour every `TenantStore` must show. Each check gets a fresh store.
mod conformance {
    use super::*;

    pub async fn allows_adding_a_new_tenant<S: TenantStore>(store: S) {
        let tenant = Tenant::new("tenant1");

        store.add(tenant.clone()).await.unwrap();

        let tenants = store.list_all().await.unwrap();
        assert_eq!(tenants, vec![tenant]);
    }

    pub async fn allows_adding_many_tenants_in_parallel<S: TenantStore + 'static>(store: S) {
        let store = Arc::new(store);

        let handles: Vec<_> = (1..=100)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.add(Tenant::new(format!("tenant{i}"))).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.list_all().await.unwrap().len(), 100);
    }

    pub async fn exactly_one_concurrent_add_of_an_id_wins<S: TenantStore + 'static>(store: S) {
        let store = Arc::new(store);

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .add(Tenant::new("contested").with_display_name(format!("writer {i}")))
                        .await
                })
            })
            .collect();

        let results: Vec<_> = join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, TenancyError::DuplicateTenant { id } if id == "contested")));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    pub async fn rejects_duplicate_ids<S: TenantStore>(store: S) {
        store.add(Tenant::new("tenant1")).await.unwrap();

        let err = store.add(Tenant::new("tenant1")).await.unwrap_err();

        assert!(matches!(err, TenancyError::DuplicateTenant { .. }));
        assert_eq!(err.to_string(), "Tenant with id 'tenant1' already exists");
    }

    pub async fn allows_removing_existing_tenant<S: TenantStore>(store: S) {
        store.add(Tenant::new("tenant1")).await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 1);

        store.remove("tenant1").await.unwrap();

        assert!(store.list_all().await.unwrap().is_empty());
    }

    pub async fn removing_unknown_tenant_is_a_no_op<S: TenantStore>(store: S) {
        store.add(Tenant::new("tenant2")).await.unwrap();

        store.remove("tenant1").await.unwrap();
        store.remove("tenant1").await.unwrap();

        let ids: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|t| t.id().to_string())
            .collect();
        assert_eq!(ids, vec!["tenant2"]);
    }

    pub async fn update_replaces_existing_record<S: TenantStore>(store: S) {
        store.add(Tenant::new("tenant1")).await.unwrap();

        let updated = Tenant::new("tenant1")
            .with_display_name("Tenant One")
            .with_attribute("region", "eu");
        store.update(updated.clone()).await.unwrap();

        assert_eq!(store.list_all().await.unwrap(), vec![updated]);
    }

    pub async fn update_of_unknown_tenant_fails<S: TenantStore>(store: S) {
        let err = store.update(Tenant::new("ghost")).await.unwrap_err();

        assert!(matches!(err, TenancyError::TenantNotFound { .. }));
        assert_eq!(err.to_string(), "Tenant with id 'ghost' does not exist");
        assert!(store.list_all().await.unwrap().is_empty());
    }

    pub async fn can_re_add_after_removal<S: TenantStore>(store: S) {
        store.add(Tenant::new("tenant1")).await.unwrap();
        store.remove("tenant1").await.unwrap();

        store.add(Tenant::new("tenant1")).await.unwrap();

        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}

mod in_memory {
    use super::*;

    #[tokio::test]
    async fn allows_adding_a_new_tenant() {
        conformance::allows_adding_a_new_tenant(InMemoryTenantStore::new()).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn allows_adding_many_tenants_in_parallel() {
        conformance::allows_adding_many_tenants_in_parallel(InMemoryTenantStore::new()).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn exactly_one_concurrent_add_of_an_id_wins() {
        conformance::exactly_one_concurrent_add_of_an_id_wins(InMemoryTenantStore::new()).await;
    }

    #[tokio::test]
    async fn rejects_duplicate_ids() {
        conformance::rejects_duplicate_ids(InMemoryTenantStore::new()).await;
    }

    #[tokio::test]
    async fn allows_removing_existing_tenant() {
        conformance::allows_removing_existing_tenant(InMemoryTenantStore::new()).await;
    }

    #[tokio::test]
    async fn removing_unknown_tenant_is_a_no_op() {
        conformance::removing_unknown_tenant_is_a_no_op(InMemoryTenantStore::new()).await;
    }

    #[tokio::test]
    async fn update_replaces_existing_record() {
        conformance::update_replaces_existing_record(InMemoryTenantStore::new()).await;
    }

    #[tokio::test]
    async fn update_of_unknown_tenant_fails() {
        conformance::update_of_unknown_tenant_fails(InMemoryTenantStore::new()).await;
    }

    #[tokio::test]
    async fn can_re_add_after_removal() {
        conformance::can_re_add_after_removal(InMemoryTenantStore::new()).await;
    }
}
