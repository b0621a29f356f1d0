mod admin;
mod app;
mod config;

pub use app::TenantsApp;
pub use config::{default_config, load_config, ENV_PREFIX};

use anyhow::Result;
use tenancy_core::TenancyConfig;

pub fn build(config: TenancyConfig) -> Result<TenantsApp> {
    app::tenants_app(config)
}
