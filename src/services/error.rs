use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Storage provider error: {0}")]
    ProviderError(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl StorageError {
    /// Maps a non-success Drive response to an error, keeping the provider's message.
    pub fn from_status(status: reqwest::StatusCode, context: &str, body: String) -> Self {
        let message = provider_message(&body).unwrap_or(body);
        match status.as_u16() {
            404 => StorageError::NotFound(format!("{}: {}", context, message)),
            401 | 403 => StorageError::Unauthorized(format!("{}: {}", context, message)),
            _ => StorageError::ProviderError(format!(
                "{} failed with status {}: {}",
                context, status, message
            )),
        }
    }
}

/// Drive errors look like `{"error": {"code": 404, "message": "File not found: x."}}`.
fn provider_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

impl From<reqwest::Error> for StorageError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            StorageError::NetworkError("Request timeout".to_string())
        } else if error.is_connect() {
            StorageError::NetworkError(format!("Connection failed: {}", error))
        } else if let Some(status) = error.status() {
            match status.as_u16() {
                404 => StorageError::NotFound(error.to_string()),
                401 | 403 => StorageError::Unauthorized(error.to_string()),
                _ => StorageError::ProviderError(error.to_string()),
            }
        } else {
            StorageError::InternalError(error.to_string())
        }
    }
}
