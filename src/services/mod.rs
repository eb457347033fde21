mod error;
mod google_drive_storage;

pub use error::StorageError;
pub use google_drive_storage::GDriveStorageService;

use std::sync::Arc;

use tracing::warn;

use crate::{application::services::StorageService, domain::config::credentials::CredentialSource};

/// Builds the Drive client, or `None` when credentials are missing or unusable.
pub fn create_storage_service(source: &CredentialSource) -> Option<Arc<dyn StorageService>> {
    let credentials = match source.resolve() {
        Ok(credentials) => credentials,
        Err(e) => {
            warn!("{}", e);
            warn!("Service account credentials not configured; Drive endpoints will fail");
            return None;
        }
    };

    match GDriveStorageService::new(credentials) {
        Ok(service) => Some(Arc::new(service)),
        Err(e) => {
            warn!("Failed to initialize Drive client: {}", e);
            None
        }
    }
}
