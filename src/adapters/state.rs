use std::{path::PathBuf, sync::Arc};

use crate::application::{error::ApplicationError, services::StorageService};

/// Read-only request context. Built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub storage_service: Option<Arc<dyn StorageService>>,
    pub default_folder_id: Option<String>,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn storage(&self) -> Result<Arc<dyn StorageService>, ApplicationError> {
        self.storage_service
            .clone()
            .ok_or(ApplicationError::ServiceUnavailable)
    }

    pub fn is_drive_configured(&self) -> bool {
        self.storage_service.is_some()
    }

    /// A non-blank requested folder wins over the configured default.
    pub fn resolve_folder(&self, requested: Option<String>) -> Option<String> {
        requested
            .filter(|id| !id.trim().is_empty())
            .or_else(|| self.default_folder_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(default_folder_id: Option<&str>) -> AppState {
        AppState {
            storage_service: None,
            default_folder_id: default_folder_id.map(str::to_string),
            upload_dir: std::env::temp_dir(),
        }
    }

    #[test]
    fn requested_folder_overrides_default() {
        let state = state(Some("default"));
        assert_eq!(
            state.resolve_folder(Some("F1".to_string())).as_deref(),
            Some("F1")
        );
        assert_eq!(state.resolve_folder(None).as_deref(), Some("default"));
        assert_eq!(
            state.resolve_folder(Some(String::new())).as_deref(),
            Some("default")
        );
    }

    #[test]
    fn no_folder_when_nothing_configured() {
        assert_eq!(state(None).resolve_folder(None), None);
    }

    #[test]
    fn unconfigured_storage_is_unavailable() {
        let state = state(None);
        assert!(!state.is_drive_configured());
        assert!(matches!(
            state.storage(),
            Err(ApplicationError::ServiceUnavailable)
        ));
    }
}
