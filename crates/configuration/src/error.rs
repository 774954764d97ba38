//! Errors that make the service refuse to start.

use thiserror::Error;

use crate::environment::EnvironmentError;

/// Configuration interpretation errors. All of these are fatal at startup;
/// none can occur per-request.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("missing required configuration: {0}")]
    MissingVariable(#[from] EnvironmentError),
    #[error("invalid value for {variable}: {message}")]
    InvalidValue {
        variable: &'static str,
        message: String,
    },
}
