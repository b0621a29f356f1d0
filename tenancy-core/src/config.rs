//! # Tenancy Configuration
//!
//! A minimal string key/value store for `set()` / `get()` of settings.
//! Typed reads go through a snapshot.
//!
//! ## Setting and reading values
//! ```rust
//! use tenancy_core::TenancyConfig;
//! let mut config = TenancyConfig::new();
//!
//! config.set("tenancy.detection.header", "X-Tenant-Id");
//! config.set("tenancy.detection.host", "true");
//!
//! let snapshot = config.snapshot();
//! assert_eq!(snapshot.get_list("tenancy.detection.header"), vec!["X-Tenant-Id"]);
//! assert_eq!(snapshot.get_bool("tenancy.detection.host").unwrap(), Some(true));
//! ```
//!
//! ## Environment overrides
//! [`TenancyConfig::apply_env`] copies every variable starting with a prefix,
//! lower-casing it and turning `__` into `.`:
//!
//! ```bash
//! export TENANTS__TENANCY__DETECTION__HEADER=X-Tenant-Id   # tenancy.detection.header
//! ```

use std::collections::HashMap;

use crate::errors::{TenancyError, TenancyResult};

pub const DETECTION_HEADER: &str = "tenancy.detection.header";
pub const DETECTION_HOST: &str = "tenancy.detection.host";
pub const ACTIVITY_TAG: &str = "tenancy.activity_tag";
pub const DISABLED_ROUTES: &str = "tenancy.disabled.routes";
pub const DISABLED_GROUPS: &str = "tenancy.disabled.groups";

#[derive(Debug, Default, Clone)]
pub struct TenancyConfig {
    values: HashMap<String, String>,
}

impl TenancyConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Layer `PREFIX__A__B=value` pairs from `vars` on top of the current values.
    pub fn apply_vars<I>(&mut self, prefix: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix = format!("{prefix}__");
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(&prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                self.set(normalized, value);
            }
        }
    }

    pub fn apply_env(&mut self, prefix: &str) {
        self.apply_vars(prefix, std::env::vars());
    }

    /// Fresh config holding only the `PREFIX__*` environment variables.
    pub fn from_env(prefix: &str) -> Self {
        let mut config = Self::new();
        config.apply_env(prefix);
        config
    }

    pub fn snapshot(&self) -> TenancyConfigSnapshot {
        TenancyConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TenancyConfigSnapshot {
    map: HashMap<String, String>,
}

impl TenancyConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    /// `true`/`false`/`1`/`0`, case-insensitive. Anything else is a config error.
    pub fn get_bool(&self, key: &str) -> TenancyResult<Option<bool>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };

        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(TenancyError::Config {
                key: key.to_string(),
                message: format!("expected a boolean, got '{raw}'"),
            }),
        }
    }

    /// Comma-separated list; entries are trimmed and empty ones dropped.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_are_normalized_into_dotted_keys() {
        let mut config = TenancyConfig::new();
        config.apply_vars(
            "TENANTS",
            vec![
                ("TENANTS__TENANCY__DETECTION__HEADER".to_string(), "X-Tenant-Id".to_string()),
                ("TENANTS__HTTP__PORT".to_string(), "8080".to_string()),
                ("OTHER__HTTP__PORT".to_string(), "9090".to_string()),
            ],
        );

        assert_eq!(config.get(DETECTION_HEADER), Some("X-Tenant-Id"));
        assert_eq!(config.snapshot().get_usize("http.port"), Some(8080));
        assert!(!config.has("other.http.port"));
    }

    #[test]
    fn from_env_reads_prefixed_process_variables() {
        std::env::set_var("TENANCY_CONFIG_TEST__TENANCY__ACTIVITY_TAG", "org");

        let config = TenancyConfig::from_env("TENANCY_CONFIG_TEST");

        assert_eq!(config.get(ACTIVITY_TAG), Some("org"));
    }

    #[test]
    fn lists_are_trimmed_and_skip_empty_entries() {
        let mut config = TenancyConfig::new();
        config.set(DISABLED_ROUTES, " /health, ,/metrics ");
        assert_eq!(config.snapshot().get_list(DISABLED_ROUTES), vec!["/health", "/metrics"]);
        assert!(config.snapshot().get_list(DISABLED_GROUPS).is_empty());
    }

    #[test]
    fn invalid_bool_is_a_config_error() {
        let mut config = TenancyConfig::new();
        config.set(DETECTION_HOST, "sometimes");

        let err = config.snapshot().get_bool(DETECTION_HOST).unwrap_err();
        assert!(matches!(err, TenancyError::Config { ref key, .. } if key == DETECTION_HOST));

        config.set(DETECTION_HOST, "TRUE");
        assert_eq!(config.snapshot().get_bool(DETECTION_HOST).unwrap(), Some(true));
    }
}
