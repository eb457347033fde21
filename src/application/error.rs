use thiserror::Error;

use crate::services::StorageError;

#[derive(Debug)]
pub enum ApplicationError {
    BadRequest(String),
    PayloadTooLarge(String),
    ServiceUnavailable,
    Upstream {
        error: &'static str,
        details: String,
    },
}

impl ApplicationError {
    /// Wraps a provider failure under a fixed client-facing label.
    pub fn upstream(error: &'static str, source: StorageError) -> Self {
        ApplicationError::Upstream {
            error,
            details: source.to_string(),
        }
    }
}

/// Startup configuration failures. Missing credentials are reported but never fatal.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error(
        "No service account credentials found. Set SERVICE_ACCOUNT_JSON or GOOGLE_APPLICATION_CREDENTIALS"
    )]
    MissingCredentials,

    #[error("Invalid service account credentials: {0}")]
    InvalidCredentials(String),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
