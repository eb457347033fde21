use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    adapters::{
        controllers::{
            health_controller::HealthController, image_controller::ImageController,
            upload_controller::UploadController,
        },
        state::AppState,
    },
    application::error::ConfigurationError,
    domain::config::settings::Settings,
};

/// Builds the API routes. `/api/upload` exists only when uploads are enabled.
pub fn build_router(app_state: AppState, settings: &Settings) -> Router {
    let mut router = Router::new()
        .route("/api/health", get(HealthController::health_check))
        .route("/api/images", get(ImageController::list_images))
        .route("/api/image/{id}", get(ImageController::proxy_image));

    if settings.upload_enabled {
        router = router.route(
            "/api/upload",
            post(UploadController::upload_image)
                .layer(DefaultBodyLimit::max(settings.upload_max_bytes)),
        );
    }

    router.with_state(app_state)
}

pub fn build_cors(settings: &Settings) -> Result<CorsLayer, ConfigurationError> {
    match &settings.cors_allowed_origins {
        Some(allowed_origins) => {
            let origins = allowed_origins
                .iter()
                .map(|origin| {
                    origin
                        .parse::<HeaderValue>()
                        .map_err(|_| ConfigurationError::InvalidValue {
                            key: "CORS_ALLOWED_ORIGINS",
                            value: origin.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any))
        }
        // Allow all origins if not specified (only for development)
        None => Ok(CorsLayer::permissive()),
    }
}

/// Full application: routes plus CORS and request tracing.
pub fn build_app(app_state: AppState, settings: &Settings) -> Result<Router, ConfigurationError> {
    let cors = build_cors(settings)?;

    Ok(build_router(app_state, settings)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
