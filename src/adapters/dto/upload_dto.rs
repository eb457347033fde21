use serde::Serialize;

use crate::domain::models::file::UploadedFile;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub ok: bool,
    pub file: UploadedFile,
}

impl From<UploadedFile> for UploadResponse {
    fn from(file: UploadedFile) -> Self {
        Self { ok: true, file }
    }
}
