use axum::{extract::State, Json};
use serde::Serialize;
use tracing::debug;

use crate::adapters::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    #[serde(rename = "driveConfigured")]
    pub drive_configured: bool,
}

pub struct HealthController;

impl HealthController {
    /// Liveness plus whether a Drive client was built at startup.
    /// GET /api/health
    pub async fn health_check(State(app_state): State<AppState>) -> Json<HealthResponse> {
        debug!("Health check requested");

        Json(HealthResponse {
            ok: true,
            drive_configured: app_state.is_drive_configured(),
        })
    }
}
