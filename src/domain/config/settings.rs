use std::path::PathBuf;

use crate::{application::error::ConfigurationError, domain::config::credentials::CredentialSource};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPLOAD_MAX_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub default_folder_id: Option<String>,
    pub credentials: CredentialSource,
    pub upload_enabled: bool,
    pub upload_dir: PathBuf,
    pub upload_max_bytes: usize,
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigurationError::InvalidValue {
                key: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let upload_max_bytes = match var("UPLOAD_MAX_BYTES") {
            Some(raw) => {
                raw.trim()
                    .parse::<usize>()
                    .map_err(|_| ConfigurationError::InvalidValue {
                        key: "UPLOAD_MAX_BYTES",
                        value: raw,
                    })?
            }
            None => DEFAULT_UPLOAD_MAX_BYTES,
        };

        let upload_enabled = matches!(var("ENABLE_UPLOAD").as_deref(), Some("true") | Some("1"));

        let upload_dir = var("UPLOAD_TMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("drive-gallery"));

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Ok(Self {
            port,
            default_folder_id: var("DRIVE_FOLDER_ID"),
            credentials: CredentialSource::from_options(
                var("SERVICE_ACCOUNT_JSON"),
                var("GOOGLE_APPLICATION_CREDENTIALS"),
            ),
            upload_enabled,
            upload_dir,
            upload_max_bytes,
            cors_allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigurationError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.default_folder_id, None);
        assert_eq!(settings.credentials, CredentialSource::Missing);
        assert!(!settings.upload_enabled);
        assert_eq!(settings.upload_max_bytes, DEFAULT_UPLOAD_MAX_BYTES);
        assert!(settings.cors_allowed_origins.is_none());
    }

    #[test]
    fn upload_flag_accepts_true_and_one_only() {
        assert!(settings(&[("ENABLE_UPLOAD", "true")]).unwrap().upload_enabled);
        assert!(settings(&[("ENABLE_UPLOAD", "1")]).unwrap().upload_enabled);
        assert!(!settings(&[("ENABLE_UPLOAD", "yes")]).unwrap().upload_enabled);
        assert!(!settings(&[("ENABLE_UPLOAD", "TRUE")]).unwrap().upload_enabled);
    }

    #[test]
    fn blank_values_are_ignored() {
        let settings = settings(&[("DRIVE_FOLDER_ID", "  "), ("PORT", "")]).unwrap();
        assert_eq!(settings.default_folder_id, None);
        assert_eq!(settings.port, DEFAULT_PORT);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = settings(&[("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn parses_cors_origins() {
        let settings = settings(&[(
            "CORS_ALLOWED_ORIGINS",
            "https://a.example.com, https://b.example.com,",
        )])
        .unwrap();
        assert_eq!(
            settings.cors_allowed_origins.unwrap(),
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn file_path_credentials_are_picked_up() {
        let settings = settings(&[
            ("GOOGLE_APPLICATION_CREDENTIALS", "/run/secrets/sa.json"),
            ("DRIVE_FOLDER_ID", "folder-1"),
        ])
        .unwrap();
        assert_eq!(
            settings.credentials,
            CredentialSource::FilePath(PathBuf::from("/run/secrets/sa.json"))
        );
        assert_eq!(settings.default_folder_id.as_deref(), Some("folder-1"));
    }
}
