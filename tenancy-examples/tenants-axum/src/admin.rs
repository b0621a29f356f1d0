use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tenancy_axum::TenancyAxumError;
use tenancy_core::{DefaultTenantManager, Tenant, TenancyError, TenantManager};

type Manager = Arc<DefaultTenantManager>;

pub fn router(manager: Manager) -> Router {
    Router::new()
        .route("/tenants", get(list).post(create))
        .route("/tenants/{id}", get(find).delete(remove))
        .with_state(manager)
}

async fn list(State(manager): State<Manager>) -> Result<Json<Vec<Tenant>>, TenancyAxumError> {
    let mut tenants = manager.list_all().await?;
    tenants.sort_by(|a, b| a.id().cmp(b.id()));
    Ok(Json(tenants))
}

async fn create(
    State(manager): State<Manager>,
    Json(tenant): Json<Tenant>,
) -> Result<(StatusCode, Json<Tenant>), TenancyAxumError> {
    manager.add(tenant.clone()).await?;
    tracing::info!(tenant_id = %tenant.id(), "tenant created");
    Ok((StatusCode::CREATED, Json(tenant)))
}

async fn find(
    State(manager): State<Manager>,
    Path(id): Path<String>,
) -> Result<Json<Tenant>, TenancyAxumError> {
    let tenant = manager
        .get(&id)
        .await?
        .ok_or_else(|| TenancyError::tenant_not_found(&id))?;
    Ok(Json(tenant))
}

async fn remove(
    State(manager): State<Manager>,
    Path(id): Path<String>,
) -> Result<StatusCode, TenancyAxumError> {
    manager.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
