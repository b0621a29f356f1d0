use std::sync::Arc;

use anyhow::Result;
use axum::routing::get;
use axum::{Json, Router};
use tenancy_axum::{CurrentTenant, RequestTenancyBuilder, RequestTenancyLayer, TenancyMakeSpan};
use tenancy_core::{
    DefaultTenantManager, DependencyRegistry, InMemoryTenantStore, TenancyConfig,
    TenancyConfigSnapshot, TenantContext,
};
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::trace::TraceLayer;

pub struct TenantsApp {
    pub config: TenancyConfigSnapshot,
    pub manager: Arc<DefaultTenantManager>,
    pub router: Router,
}

impl TenantsApp {
    pub async fn listen<A>(self, addr: A) -> Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

pub fn tenants_app(config: TenancyConfig) -> Result<TenantsApp> {
    let config = config.snapshot();
    let options = RequestTenancyBuilder::from_config(&config)?.build(&DependencyRegistry::new())?;
    tracing::debug!(?options, "request tenancy configured");

    let manager = Arc::new(DefaultTenantManager::new(Arc::new(InMemoryTenantStore::new())));

    let router = Router::new()
        .route("/whoami", get(whoami))
        .route("/health", get(|| async { "ok" }))
        .nest("/admin", crate::admin::router(Arc::clone(&manager)))
        .layer(RequestTenancyLayer::new(options))
        .layer(TraceLayer::new_for_http().make_span_with(TenancyMakeSpan));

    Ok(TenantsApp {
        config,
        manager,
        router,
    })
}

async fn whoami(CurrentTenant(tenant): CurrentTenant) -> Json<Option<TenantContext>> {
    tracing::info!("whoami");
    Json(tenant)
}
