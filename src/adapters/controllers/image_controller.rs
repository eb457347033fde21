use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use futures::TryStreamExt;
use tracing::{debug, error, info};

use crate::{
    adapters::{
        dto::image_dto::{ImageResponse, ListImagesQuery},
        state::AppState,
    },
    application::error::ApplicationError,
    domain::models::file::DriveFile,
    services::StorageError,
};

const LIST_FAILED: &str = "failed to list files";
const FETCH_FAILED: &str = "failed to fetch file";

pub struct ImageController;

impl ImageController {
    /// GET /api/images?folderId=...
    pub async fn list_images(
        State(app_state): State<AppState>,
        query: Result<Query<ListImagesQuery>, QueryRejection>,
    ) -> Result<Json<Vec<ImageResponse>>, ApplicationError> {
        let service = app_state.storage()?;
        let Query(query) =
            query.map_err(|rejection| ApplicationError::BadRequest(rejection.body_text()))?;

        let folder_id = app_state.resolve_folder(query.folder_id).ok_or_else(|| {
            ApplicationError::BadRequest(
                "folderId is required (or set DRIVE_FOLDER_ID)".to_string(),
            )
        })?;

        let files = service
            .list_images(&folder_id)
            .await
            .map_err(|e| ApplicationError::upstream(LIST_FAILED, e))?;

        let images: Vec<ImageResponse> = files
            .into_iter()
            .filter(DriveFile::is_listable_image)
            .map(ImageResponse::from)
            .collect();

        info!("Listed {} images in folder {}", images.len(), folder_id);

        Ok(Json(images))
    }

    /// Streams a file's bytes with the provider-reported content type.
    /// GET /api/image/{id}
    pub async fn proxy_image(
        State(app_state): State<AppState>,
        Path(file_id): Path<String>,
    ) -> Result<Response, ApplicationError> {
        let service = app_state.storage()?;

        let metadata = service
            .get_metadata(&file_id)
            .await
            .map_err(|e| ApplicationError::upstream(FETCH_FAILED, e))?;

        debug!(
            "Proxying {} ({}) as {}",
            file_id,
            metadata.name.as_deref().unwrap_or("unnamed"),
            metadata.mime_type
        );

        let content = service
            .download_stream(&file_id)
            .await
            .map_err(|e| ApplicationError::upstream(FETCH_FAILED, e))?;

        // Headers are fixed here, before the body is polled for its first chunk.
        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, metadata.mime_type);
        if let Some(length) = content.content_length {
            builder = builder.header(header::CONTENT_LENGTH, length);
        }

        let stream = content
            .stream
            .inspect_err(move |e| error!("Stream error while proxying {}: {}", file_id, e));

        builder.body(Body::from_stream(stream)).map_err(|e| {
            ApplicationError::upstream(FETCH_FAILED, StorageError::InternalError(e.to_string()))
        })
    }
}
