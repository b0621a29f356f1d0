//! Core multi-tenant types.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A known tenant, as kept by a [`TenantStore`](crate::TenantStore).
///
/// The id is the stable identity of the tenant. It is case-sensitive and
/// cannot change after construction; uniqueness is enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Tenant {
    id: String,
    pub display_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: HashMap<String, String>,
}

impl Tenant {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            attributes: HashMap::new(),
        }
    }

    pub fn with_display_name<S: Into<String>>(mut self, display_name: S) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_attribute<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Snapshot of this tenant as the context of an operation.
    pub fn context(&self) -> TenantContext {
        TenantContext::new(self.id.clone(), self.display_name.clone())
    }
}

/// The tenant active for the current logical operation.
///
/// Detection strategies produce this directly from the resolved identifier;
/// it is never looked up from a store, and removing the tenant from a store
/// does not invalidate contexts that were already handed out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TenantContext {
    pub id: String,
    pub display_name: Option<String>,
}

impl TenantContext {
    pub fn new<S: Into<String>>(id: S, display_name: Option<String>) -> Self {
        Self {
            id: id.into(),
            display_name,
        }
    }

    /// Context whose display name is the id itself, as request detection builds it.
    pub fn from_id<S: Into<String>>(id: S) -> Self {
        let id = id.into();
        Self {
            display_name: Some(id.clone()),
            id,
        }
    }
}
