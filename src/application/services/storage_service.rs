use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::{
    domain::models::file::{DriveFile, FileData, FileMetadata, UploadedFile},
    services::StorageError,
};

pub type ByteStream = BoxStream<'static, Result<Bytes, StorageError>>;

/// A file's content as an open stream, plus its length when the provider reports one.
pub struct FileContent {
    pub content_length: Option<u64>,
    pub stream: ByteStream,
}

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Lists at most one page (200 records) of image files in `folder_id`.
    async fn list_images(&self, folder_id: &str) -> Result<Vec<DriveFile>, StorageError>;
    async fn get_metadata(&self, file_id: &str) -> Result<FileMetadata, StorageError>;
    async fn download_stream(&self, file_id: &str) -> Result<FileContent, StorageError>;
    async fn upload(&self, file_data: FileData) -> Result<UploadedFile, StorageError>;
}
