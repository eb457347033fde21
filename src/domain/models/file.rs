use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A file record as returned by the Drive `files.list` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "thumbnailLink")]
    pub thumbnail_link: Option<String>,
    #[serde(rename = "webViewLink")]
    pub web_view_link: Option<String>,
    #[serde(default)]
    pub trashed: bool,
}

impl DriveFile {
    /// Only non-trashed `image/*` records are ever handed to clients.
    pub fn is_listable_image(&self) -> bool {
        !self.trashed && self.mime_type.starts_with("image/")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileMetadata {
    pub mime_type: String,
    pub name: Option<String>,
}

impl FileMetadata {
    pub fn new(mime_type: Option<String>, name: Option<String>) -> Self {
        Self {
            mime_type: mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
            name,
        }
    }
}

/// A multipart upload already spooled to local disk, waiting to be sent to Drive.
#[derive(Debug, Clone)]
pub struct FileData {
    pub path: PathBuf,
    pub filename: String,
    pub mime_type: String,
    pub folder_id: String,
}

impl FileData {
    pub fn new(path: PathBuf, filename: String, mime_type: String, folder_id: String) -> Self {
        Self {
            path,
            filename,
            mime_type,
            folder_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive_file(mime_type: &str, trashed: bool) -> DriveFile {
        DriveFile {
            id: "1".to_string(),
            name: "a".to_string(),
            mime_type: mime_type.to_string(),
            thumbnail_link: None,
            web_view_link: None,
            trashed,
        }
    }

    #[test]
    fn only_untrashed_images_are_listable() {
        assert!(drive_file("image/png", false).is_listable_image());
        assert!(!drive_file("image/png", true).is_listable_image());
        assert!(!drive_file("application/pdf", false).is_listable_image());
        assert!(!drive_file("text/image/png", false).is_listable_image());
    }

    #[test]
    fn metadata_falls_back_to_octet_stream() {
        assert_eq!(FileMetadata::new(None, None).mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(
            FileMetadata::new(Some(String::new()), None).mime_type,
            DEFAULT_MIME_TYPE
        );
        assert_eq!(
            FileMetadata::new(Some("image/gif".to_string()), None).mime_type,
            "image/gif"
        );
    }

    #[test]
    fn drive_file_parses_without_optional_fields() {
        let file: DriveFile =
            serde_json::from_str(r#"{"id":"x","name":"cat.jpg","mimeType":"image/jpeg"}"#)
                .unwrap();
        assert_eq!(file.thumbnail_link, None);
        assert!(!file.trashed);
    }
}
