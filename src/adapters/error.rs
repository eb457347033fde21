use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::application::error::ApplicationError;

pub const NOT_CONFIGURED_MESSAGE: &str = "Drive client not configured";

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApplicationError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            ApplicationError::PayloadTooLarge(msg) => {
                warn!("Payload too large: {}", msg);
                (StatusCode::PAYLOAD_TOO_LARGE, json!({ "error": msg }))
            }
            ApplicationError::ServiceUnavailable => {
                error!("Request rejected: {}", NOT_CONFIGURED_MESSAGE);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": NOT_CONFIGURED_MESSAGE }),
                )
            }
            ApplicationError::Upstream { error, details } => {
                error!("{}: {}", error, details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": error, "details": details }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;
    use crate::services::StorageError;

    async fn render(error: ApplicationError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn bad_request_keeps_message() {
        let (status, body) =
            render(ApplicationError::BadRequest("folderId is required".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "folderId is required" }));
    }

    #[tokio::test]
    async fn payload_too_large_is_413() {
        let (status, body) =
            render(ApplicationError::PayloadTooLarge("length limit exceeded".to_string())).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, json!({ "error": "length limit exceeded" }));
    }

    #[tokio::test]
    async fn unconfigured_is_server_error() {
        let (status, body) = render(ApplicationError::ServiceUnavailable).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], NOT_CONFIGURED_MESSAGE);
    }

    #[tokio::test]
    async fn upstream_passes_details_through() {
        let (status, body) = render(ApplicationError::upstream(
            "failed to list files",
            StorageError::ProviderError("quota exceeded".to_string()),
        ))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "failed to list files");
        assert_eq!(body["details"], "Storage provider error: quota exceeded");
    }
}
