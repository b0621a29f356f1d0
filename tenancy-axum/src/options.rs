//! Request tenancy configuration.
//!
//! ```rust
//! use tenancy_axum::RequestTenancyBuilder;
//! use tenancy_core::DependencyRegistry;
//!
//! let options = RequestTenancyBuilder::new()
//!     .detect_from_request_header("X-Tenant-Id")
//!     .detect_from_request_host()
//!     .disable_for_route("/health")
//!     .build(&DependencyRegistry::new())
//!     .unwrap();
//!
//! assert_eq!(options.strategies().len(), 2);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tenancy_core::config::{ACTIVITY_TAG, DETECTION_HEADER, DETECTION_HOST, DISABLED_GROUPS, DISABLED_ROUTES};
use tenancy_core::{DependencyRegistry, FromDependencies, TenancyConfigSnapshot, TenancyResult};

use crate::detection::{FromRequestHeaderStrategy, FromRequestHostStrategy, TenantDetectionStrategy};

pub const DEFAULT_ACTIVITY_TAG: &str = "tenant";

pub type StrategyFactory =
    Box<dyn FnOnce(&DependencyRegistry) -> TenancyResult<Arc<dyn TenantDetectionStrategy>> + Send>;

enum StrategyEntry {
    Instance(Arc<dyn TenantDetectionStrategy>),
    Factory(StrategyFactory),
}

/// Resolved request tenancy settings used by the detection gate.
#[derive(Clone)]
pub struct RequestTenancyOptions {
    strategies: Vec<Arc<dyn TenantDetectionStrategy>>,
    activity_tag_name: String,
    disabled_routes: HashSet<String>,
    disabled_groups: Vec<String>,
}

impl Default for RequestTenancyOptions {
    fn default() -> Self {
        Self {
            strategies: Vec::new(),
            activity_tag_name: DEFAULT_ACTIVITY_TAG.to_string(),
            disabled_routes: HashSet::new(),
            disabled_groups: Vec::new(),
        }
    }
}

impl RequestTenancyOptions {
    /// Strategies in detection order.
    pub fn strategies(&self) -> &[Arc<dyn TenantDetectionStrategy>] {
        &self.strategies
    }

    /// Name of the span field the detected tenant id is recorded into.
    pub fn activity_tag_name(&self) -> &str {
        &self.activity_tag_name
    }

    /// Whether tenant detection is switched off for the route `path`.
    ///
    /// `path` is the matched route pattern (or the raw path when no route matched).
    /// Groups match the prefix itself and anything below it.
    pub fn is_disabled_for(&self, path: &str) -> bool {
        if self.disabled_routes.contains(path) {
            return true;
        }

        self.disabled_groups.iter().any(|group| {
            path == group
                || path
                    .strip_prefix(group.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

impl fmt::Debug for RequestTenancyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("RequestTenancyOptions")
            .field("strategies", &names)
            .field("activity_tag_name", &self.activity_tag_name)
            .field("disabled_routes", &self.disabled_routes)
            .field("disabled_groups", &self.disabled_groups)
            .finish()
    }
}

/// Collects detection strategies in registration order.
pub struct RequestTenancyBuilder {
    entries: Vec<StrategyEntry>,
    activity_tag_name: String,
    disabled_routes: HashSet<String>,
    disabled_groups: Vec<String>,
}

impl Default for RequestTenancyBuilder {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            activity_tag_name: DEFAULT_ACTIVITY_TAG.to_string(),
            disabled_routes: HashSet::new(),
            disabled_groups: Vec::new(),
        }
    }
}

impl RequestTenancyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-filled from `tenancy.*` configuration keys.
    ///
    /// Header strategies come first (in listed order), then the host strategy.
    pub fn from_config(config: &TenancyConfigSnapshot) -> TenancyResult<Self> {
        let mut builder = Self::new();

        for header in config.get_list(DETECTION_HEADER) {
            builder = builder.detect_from_request_header(header);
        }

        if config.get_bool(DETECTION_HOST)?.unwrap_or(false) {
            builder = builder.detect_from_request_host();
        }

        if let Some(tag) = config.get_string(ACTIVITY_TAG) {
            builder = builder.activity_tag_name(tag);
        }

        for route in config.get_list(DISABLED_ROUTES) {
            builder = builder.disable_for_route(route);
        }

        for group in config.get_list(DISABLED_GROUPS) {
            builder = builder.disable_for_group(group);
        }

        Ok(builder)
    }

    pub fn detect_from_request_header(self, header_name: impl Into<String>) -> Self {
        self.detect_using(FromRequestHeaderStrategy::new(header_name))
    }

    pub fn detect_from_request_host(self) -> Self {
        self.detect_using(FromRequestHostStrategy::new())
    }

    pub fn detect_using<T>(self, strategy: T) -> Self
    where
        T: TenantDetectionStrategy + 'static,
    {
        self.detect_using_arc(Arc::new(strategy))
    }

    /// Register a shared instance; the same `Arc` ends up in the options.
    pub fn detect_using_arc(mut self, strategy: Arc<dyn TenantDetectionStrategy>) -> Self {
        self.entries.push(StrategyEntry::Instance(strategy));
        self
    }

    /// Register a strategy type, built from the dependency registry at `build` time.
    pub fn detect_using_type<T>(self) -> Self
    where
        T: TenantDetectionStrategy + FromDependencies + 'static,
    {
        self.detect_using_factory(|deps| {
            let strategy: Arc<dyn TenantDetectionStrategy> = Arc::new(T::from_dependencies(deps)?);
            Ok(strategy)
        })
    }

    pub fn detect_using_factory<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(&DependencyRegistry) -> TenancyResult<Arc<dyn TenantDetectionStrategy>> + Send + 'static,
    {
        self.entries.push(StrategyEntry::Factory(Box::new(factory)));
        self
    }

    pub fn activity_tag_name(mut self, name: impl Into<String>) -> Self {
        self.activity_tag_name = name.into();
        self
    }

    /// Skip detection for one route pattern, e.g. `/health` or `/users/{id}`.
    pub fn disable_for_route(mut self, route: impl Into<String>) -> Self {
        self.disabled_routes.insert(route.into());
        self
    }

    /// Skip detection for a route prefix, e.g. `/admin`.
    pub fn disable_for_group(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.disabled_groups.push(prefix.trim_end_matches('/').to_string());
        self
    }

    pub fn build(self, deps: &DependencyRegistry) -> TenancyResult<RequestTenancyOptions> {
        let mut strategies = Vec::with_capacity(self.entries.len());

        for entry in self.entries {
            let strategy = match entry {
                StrategyEntry::Instance(strategy) => strategy,
                StrategyEntry::Factory(factory) => factory(deps)?,
            };
            strategies.push(strategy);
        }

        if strategies.is_empty() {
            tracing::warn!("request tenancy configured without detection strategies");
        }

        Ok(RequestTenancyOptions {
            strategies,
            activity_tag_name: self.activity_tag_name,
            disabled_routes: self.disabled_routes,
            disabled_groups: self.disabled_groups,
        })
    }
}
