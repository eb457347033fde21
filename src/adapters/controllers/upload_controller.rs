use std::path::Path;

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::{
    adapters::{dto::upload_dto::UploadResponse, state::AppState},
    application::error::ApplicationError,
    domain::models::file::{FileData, DEFAULT_MIME_TYPE},
    services::StorageError,
};

const UPLOAD_FAILED: &str = "upload failed";

/// The `image` part spooled to disk. The temp file is removed when this is dropped.
struct PendingUpload {
    file: NamedTempFile,
    filename: String,
    mime_type: String,
}

impl PendingUpload {
    async fn cleanup(self) {
        let path = self.file.path().to_path_buf();
        let file = self.file;
        let removed = tokio::task::spawn_blocking(move || file.close())
            .await
            .map_err(std::io::Error::other)
            .and_then(|result| result);

        if let Err(e) = removed {
            warn!("Failed to remove temporary upload {}: {}", path.display(), e);
        }
    }
}

/// Keeps the extractor's status so an oversized body is reported as 413.
fn multipart_error(e: MultipartError) -> ApplicationError {
    let message = e.body_text();
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApplicationError::PayloadTooLarge(message)
    } else {
        ApplicationError::BadRequest(format!("invalid multipart body: {}", message))
    }
}

fn spool_error(e: std::io::Error) -> ApplicationError {
    ApplicationError::upstream(
        UPLOAD_FAILED,
        StorageError::InternalError(format!("cannot spool upload: {}", e)),
    )
}

async fn spool_field(
    upload_dir: &Path,
    mut field: Field<'_>,
) -> Result<PendingUpload, ApplicationError> {
    let client_filename = field
        .file_name()
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    let mime_type = field
        .content_type()
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string();

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(spool_error)?;

    let dir = upload_dir.to_path_buf();
    let (file, handle) = tokio::task::spawn_blocking(move || {
        let file = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(&dir)?;
        let handle = file.reopen()?;
        Ok::<_, std::io::Error>((file, handle))
    })
    .await
    .map_err(|e| spool_error(std::io::Error::other(e)))?
    .map_err(spool_error)?;

    let mut writer = tokio::fs::File::from_std(handle);
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        writer.write_all(&chunk).await.map_err(spool_error)?;
    }
    writer.flush().await.map_err(spool_error)?;

    let filename = client_filename.unwrap_or_else(|| {
        file.path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    Ok(PendingUpload {
        file,
        filename,
        mime_type,
    })
}

pub struct UploadController;

impl UploadController {
    /// Multipart: `image` (file, required) and `folderId` (text, optional).
    /// POST /api/upload
    pub async fn upload_image(
        State(app_state): State<AppState>,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Json<UploadResponse>, ApplicationError> {
        let service = app_state.storage()?;
        let mut multipart = multipart.map_err(|rejection| {
            ApplicationError::BadRequest(format!("invalid multipart body: {}", rejection.body_text()))
        })?;

        let mut pending: Option<PendingUpload> = None;
        let mut folder_id: Option<String> = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "image" => {
                    pending = Some(spool_field(&app_state.upload_dir, field).await?);
                }
                "folderId" => {
                    folder_id = Some(field.text().await.map_err(multipart_error)?);
                }
                _ => {}
            }
        }

        let pending = pending.ok_or_else(|| {
            ApplicationError::BadRequest(
                "image file required (multipart/form-data field `image`)".to_string(),
            )
        })?;

        let folder_id = app_state.resolve_folder(folder_id).ok_or_else(|| {
            ApplicationError::BadRequest("folderId required (or set DRIVE_FOLDER_ID)".to_string())
        })?;

        let file_data = FileData::new(
            pending.file.path().to_path_buf(),
            pending.filename.clone(),
            pending.mime_type.clone(),
            folder_id,
        );

        let result = service.upload(file_data).await;
        pending.cleanup().await;

        let uploaded = result.map_err(|e| ApplicationError::upstream(UPLOAD_FAILED, e))?;

        info!("Upload complete: {} ({})", uploaded.name, uploaded.id);

        Ok(Json(UploadResponse::from(uploaded)))
    }
}
