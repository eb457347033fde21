use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::{StreamExt, TryStreamExt};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{multipart, Client, Url};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::{
    application::services::{FileContent, StorageService},
    domain::{
        config::credentials::ServiceAccountKey,
        models::file::{DriveFile, FileData, FileMetadata, UploadedFile},
    },
    services::error::StorageError,
};

const GOOGLE_DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const GOOGLE_UPLOAD_API_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

const DRIVE_SCOPES: &str =
    "https://www.googleapis.com/auth/drive.readonly https://www.googleapis.com/auth/drive.file";

// Single page only, larger folders are truncated.
const LIST_PAGE_SIZE: &str = "200";
const LIST_FIELDS: &str = "files(id,name,mimeType,thumbnailLink,webViewLink,trashed)";

const ASSERTION_LIFETIME_SECS: i64 = 3600;
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFileMetadata {
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
    name: Option<String>,
}

pub struct GDriveStorageService {
    client: Client,
    api_base: String,
    upload_base: String,
    credentials: ServiceAccountKey,
    signing_key: EncodingKey,
    access_token: tokio::sync::Mutex<Option<CachedToken>>,
}

impl GDriveStorageService {
    pub fn new(credentials: ServiceAccountKey) -> Result<Self, StorageError> {
        Self::with_endpoints(credentials, GOOGLE_DRIVE_API_BASE, GOOGLE_UPLOAD_API_BASE)
    }

    /// Points the client at alternative Drive API roots.
    pub fn with_endpoints(
        credentials: ServiceAccountKey,
        api_base: &str,
        upload_base: &str,
    ) -> Result<Self, StorageError> {
        let signing_key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
            .map_err(|e| StorageError::InvalidCredentials(e.to_string()))?;

        Ok(Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            upload_base: upload_base.trim_end_matches('/').to_string(),
            credentials,
            signing_key,
            access_token: tokio::sync::Mutex::new(None),
        })
    }

    async fn get_access_token(&self) -> Result<String, StorageError> {
        let mut cached = self.access_token.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        debug!("Requesting new Drive access token for {}", self.credentials.client_email);

        let jwt = self.create_jwt(now)?;

        let response = self
            .client
            .post(&self.credentials.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", jwt.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StorageError::Unauthorized(format!(
                "token exchange failed with status {}: {}",
                status, error_text
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Unauthorized(e.to_string()))?;

        *cached = Some(CachedToken {
            value: token_response.access_token.clone(),
            expires_at: now + Duration::seconds(token_response.expires_in),
        });

        Ok(token_response.access_token)
    }

    fn create_jwt(&self, now: DateTime<Utc>) -> Result<String, StorageError> {
        let iat = now.timestamp();
        let claims = Claims {
            iss: &self.credentials.client_email,
            scope: DRIVE_SCOPES,
            aud: &self.credentials.token_uri,
            exp: iat + ASSERTION_LIFETIME_SECS,
            iat,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| StorageError::InternalError(e.to_string()))
    }

    fn file_url(&self, file_id: &str) -> Result<Url, StorageError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| StorageError::InternalError(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| StorageError::InternalError("invalid Drive API base".to_string()))?
            .push("files")
            .push(file_id);
        Ok(url)
    }
}

/// Escapes a value for use inside a single-quoted Drive query literal.
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn image_query(folder_id: &str) -> String {
    format!(
        "'{}' in parents and mimeType contains 'image/' and trashed = false",
        escape_query_value(folder_id)
    )
}

#[async_trait]
impl StorageService for GDriveStorageService {
    async fn list_images(&self, folder_id: &str) -> Result<Vec<DriveFile>, StorageError> {
        let token = self.get_access_token().await?;

        let query = image_query(folder_id);
        let response = self
            .client
            .get(format!("{}/files", self.api_base))
            .bearer_auth(token)
            .query(&[
                ("q", query.as_str()),
                ("fields", LIST_FIELDS),
                ("pageSize", LIST_PAGE_SIZE),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StorageError::from_status(status, "List files", error_text));
        }

        let list: FileList = response
            .json()
            .await
            .map_err(|e| StorageError::InternalError(e.to_string()))?;

        debug!("Drive returned {} files for folder {}", list.files.len(), folder_id);

        Ok(list.files)
    }

    async fn get_metadata(&self, file_id: &str) -> Result<FileMetadata, StorageError> {
        let token = self.get_access_token().await?;

        let response = self
            .client
            .get(self.file_url(file_id)?)
            .bearer_auth(token)
            .query(&[("fields", "mimeType,name")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StorageError::from_status(status, "Get metadata", error_text));
        }

        let drive_metadata: DriveFileMetadata = response
            .json()
            .await
            .map_err(|e| StorageError::InternalError(e.to_string()))?;

        Ok(FileMetadata::new(drive_metadata.mime_type, drive_metadata.name))
    }

    async fn download_stream(&self, file_id: &str) -> Result<FileContent, StorageError> {
        let token = self.get_access_token().await?;

        let response = self
            .client
            .get(self.file_url(file_id)?)
            .bearer_auth(token)
            .query(&[("alt", "media")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StorageError::from_status(status, "Download", error_text));
        }

        let content_length = response.content_length();
        let stream = response
            .bytes_stream()
            .map_err(|e| StorageError::StreamInterrupted(e.to_string()))
            .boxed();

        Ok(FileContent {
            content_length,
            stream,
        })
    }

    async fn upload(&self, file_data: FileData) -> Result<UploadedFile, StorageError> {
        let token = self.get_access_token().await?;

        let file = tokio::fs::File::open(&file_data.path)
            .await
            .map_err(|e| StorageError::InternalError(format!("cannot open upload: {}", e)))?;
        let length = file
            .metadata()
            .await
            .map_err(|e| StorageError::InternalError(format!("cannot stat upload: {}", e)))?
            .len();

        let file_metadata = serde_json::json!({
            "name": file_data.filename,
            "parents": [file_data.folder_id],
        });

        let metadata_part = multipart::Part::text(file_metadata.to_string())
            .mime_str("application/json")
            .map_err(|e| StorageError::InternalError(e.to_string()))?;

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let file_part = multipart::Part::stream_with_length(body, length)
            .file_name(file_data.filename.clone())
            .mime_str(&file_data.mime_type)
            .map_err(|e| StorageError::InternalError(e.to_string()))?;

        let form = multipart::Form::new()
            .part("metadata", metadata_part)
            .part("file", file_part);

        let response = self
            .client
            .post(format!("{}/files", self.upload_base))
            .bearer_auth(token)
            .query(&[("uploadType", "multipart"), ("fields", "id,name")])
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StorageError::from_status(status, "Upload", error_text));
        }

        let uploaded: UploadedFile = response
            .json()
            .await
            .map_err(|e| StorageError::InternalError(e.to_string()))?;

        info!(
            "Uploaded {} ({} bytes) to folder {} as {}",
            uploaded.name, length, file_data.folder_id, uploaded.id
        );

        Ok(uploaded)
    }
}
