use tenancy_core::config::{
    DETECTION_HEADER, DETECTION_HOST, DISABLED_GROUPS, DISABLED_ROUTES,
};
use tenancy_core::TenancyConfig;

pub const ENV_PREFIX: &str = "TENANTS";

pub fn default_config() -> TenancyConfig {
    let mut config = TenancyConfig::new();
    config.set("http.host", "127.0.0.1");
    config.set("http.port", "3036");
    config.set(DETECTION_HEADER, "X-Tenant-Id");
    config.set(DETECTION_HOST, "true");
    config.set(DISABLED_ROUTES, "/health");
    config.set(DISABLED_GROUPS, "/admin");
    config
}

/// Defaults overridden by `TENANTS__*` environment variables,
/// e.g. `TENANTS__TENANCY__DETECTION__HEADER=X-Org`.
pub fn load_config() -> TenancyConfig {
    let mut config = default_config();
    config.apply_env(ENV_PREFIX);
    config
}
