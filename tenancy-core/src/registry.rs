use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{TenancyError, TenancyResult};

/// A type-keyed map of shared dependencies.
///
/// Strategy types that need collaborators (a tenant manager, an HTTP client,
/// a lookup table) pull them from here inside their factory rather than
/// having them wired by reflection. Values are stored as `Arc<T>`, and `T`
/// may be a trait object, so `Arc<dyn TenantManager>` can be registered and
/// resolved as such.
#[derive(Default)]
pub struct DependencyRegistry {
    // Each value is the concrete `Arc<T>` boxed as `dyn Any`.
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl DependencyRegistry {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Register `value`, replacing any earlier value of the same type.
    pub fn insert<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.values.insert(TypeId::of::<Arc<T>>(), Box::new(value));
        self
    }

    pub fn get<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.values
            .get(&TypeId::of::<Arc<T>>())
            .and_then(|boxed| boxed.downcast_ref::<Arc<T>>())
            .cloned()
    }

    /// Like [`get`](Self::get), failing with `MissingDependency` when absent.
    pub fn require<T>(&self) -> TenancyResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get::<T>().ok_or(TenancyError::MissingDependency {
            type_name: type_name::<T>(),
        })
    }

    pub fn contains<T>(&self) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.values.contains_key(&TypeId::of::<Arc<T>>())
    }
}

impl std::fmt::Debug for DependencyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyRegistry")
            .field("len", &self.values.len())
            .finish()
    }
}

/// Explicit factory for types registered "by type".
pub trait FromDependencies: Sized {
    fn from_dependencies(deps: &DependencyRegistry) -> TenancyResult<Self>;
}
