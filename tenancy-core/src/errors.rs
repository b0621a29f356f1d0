//! # Errors (Feathers-style)
//!
//! Every failure in the tenancy crates is a [`TenancyError`]. Each variant
//! maps onto a Feathers-ish [`ErrorKind`] so transports can pick a status
//! code and class name without matching on variants themselves.
//!
//! If you enable feature `serde`, you also get `to_json()`.

/// A convenience result type for tenancy APIs.
pub type TenancyResult<T> = std::result::Result<T, TenancyError>;

/// Feathers-ish error class names + status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,   // 400
    NotFound,     // 404
    Conflict,     // 409
    GeneralError, // 500
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::GeneralError => 500,
        }
    }

    /// Feathers error `name` (e.g. "NotFound")
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::GeneralError => "GeneralError",
        }
    }

    /// Feathers error `className` (commonly kebab-cased)
    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::GeneralError => "general-error",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TenancyError {
    #[error("Tenant with id '{id}' already exists")]
    DuplicateTenant { id: String },

    #[error("Tenant with id '{id}' does not exist")]
    TenantNotFound { id: String },

    /// Detection ran in a flow that already carries a tenant.
    #[error("Tenant was already set previously in the request pipeline")]
    AlreadySet,

    #[error("No tenant detection strategies are configured")]
    NoStrategiesConfigured,

    /// A detection strategy failed; the remaining strategies were not run.
    #[error("Tenant detection strategy '{strategy}' failed: {source}")]
    Strategy {
        strategy: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Dependency '{type_name}' is not registered")]
    MissingDependency { type_name: &'static str },

    #[error("Invalid configuration value for '{key}': {message}")]
    Config { key: String, message: String },
}

impl TenancyError {
    pub fn duplicate_tenant(id: impl Into<String>) -> Self {
        Self::DuplicateTenant { id: id.into() }
    }

    pub fn tenant_not_found(id: impl Into<String>) -> Self {
        Self::TenantNotFound { id: id.into() }
    }

    pub fn strategy(strategy: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Strategy {
            strategy: strategy.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TenancyError::DuplicateTenant { .. } => ErrorKind::Conflict,
            TenancyError::TenantNotFound { .. } => ErrorKind::NotFound,
            TenancyError::Config { .. } => ErrorKind::BadRequest,
            TenancyError::AlreadySet
            | TenancyError::NoStrategiesConfigured
            | TenancyError::Strategy { .. }
            | TenancyError::MissingDependency { .. } => ErrorKind::GeneralError,
        }
    }

    pub fn code(&self) -> u16 {
        self.kind().status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind().class_name()
    }
}

#[cfg(feature = "serde")]
impl TenancyError {
    /// Feathers-ish JSON payload.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut base = json!({
            "name": self.name(),
            "message": self.to_string(),
            "code": self.code(),
            "className": self.class_name(),
        });

        match self {
            TenancyError::DuplicateTenant { id } | TenancyError::TenantNotFound { id } => {
                base["data"] = json!({ "id": id });
            }
            TenancyError::Config { key, .. } => {
                base["errors"] = json!({ key.as_str(): [self.to_string()] });
            }
            _ => {}
        }
        base
    }
}
