//! Error types for stack template construction.

use thiserror::Error;

/// Result type alias for template construction.
pub type FormationResult<T> = Result<T, FormationError>;

/// Errors that can occur while building a stack template.
///
/// Every variant is fatal: a failed build yields no document.
#[derive(Error, Debug)]
pub enum FormationError {
    #[error("Duplicate logical resource name: {0}")]
    DuplicateResource(String),

    #[error("Unknown logical resource name: {0}")]
    UnknownResource(String),

    #[error("Unknown backend type: {0}")]
    UnknownBackendType(String),

    #[error("Invalid backend options for {name}: {message}")]
    BackendOptions { name: String, message: String },

    #[error("Invalid CIDR block: {0}")]
    InvalidCidr(String),

    #[error("Unknown deployment stack '{stack}' for application {app}")]
    UnknownStack { app: String, stack: String },

    #[error("Application setting {key} for {app} is not a scalar")]
    NonScalarSetting { app: String, key: String },

    #[error("Configuration error: {0}")]
    Config(#[from] groundwork_config::ConfigError),
}
