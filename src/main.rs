mod adapters;
mod application;
mod domain;
mod services;

use adapters::{router::build_app, state::AppState};
use domain::config::settings::Settings;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A .env file is optional; real environment variables take precedence.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // reqwest and rustls need a process-wide crypto provider before the first TLS handshake
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let settings = Settings::from_env().expect("ERROR: invalid configuration");

    if settings.default_folder_id.is_none() {
        tracing::warn!(
            "DRIVE_FOLDER_ID not set. Requests must pass folderId to list or upload images."
        );
    }

    let storage_service = services::create_storage_service(&settings.credentials);

    tracing::info!(
        "Drive configured: {}, uploads enabled: {}",
        storage_service.is_some(),
        settings.upload_enabled
    );

    let app_state = AppState {
        storage_service,
        default_folder_id: settings.default_folder_id.clone(),
        upload_dir: settings.upload_dir.clone(),
    };

    let router = build_app(app_state, &settings).expect("ERROR: invalid CORS configuration");

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", settings.port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Gallery server listening on 0.0.0.0:{}", settings.port);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
