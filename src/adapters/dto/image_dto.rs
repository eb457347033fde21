use serde::{Deserialize, Serialize};

use crate::domain::models::file::DriveFile;

#[derive(Debug, Deserialize)]
pub struct ListImagesQuery {
    #[serde(rename = "folderId")]
    pub folder_id: Option<String>,
}

/// Client-facing image entry. `url` and `thumb` route back through this service.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ImageResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub url: String,
    pub thumb: String,
}

pub fn image_url(file_id: &str) -> String {
    format!("/api/image/{}", file_id)
}

impl From<DriveFile> for ImageResponse {
    fn from(file: DriveFile) -> Self {
        let url = image_url(&file.id);
        Self {
            thumb: file.thumbnail_link.unwrap_or_else(|| url.clone()),
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive_file(thumbnail_link: Option<&str>) -> DriveFile {
        DriveFile {
            id: "abc123".to_string(),
            name: "sunset.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            thumbnail_link: thumbnail_link.map(str::to_string),
            web_view_link: Some("https://drive.google.com/file/d/abc123/view".to_string()),
            trashed: false,
        }
    }

    #[test]
    fn thumb_prefers_provider_thumbnail() {
        let image = ImageResponse::from(drive_file(Some("https://lh3.example.com/abc=s220")));
        assert_eq!(image.url, "/api/image/abc123");
        assert_eq!(image.thumb, "https://lh3.example.com/abc=s220");
    }

    #[test]
    fn thumb_falls_back_to_proxy_url() {
        let image = ImageResponse::from(drive_file(None));
        assert_eq!(image.thumb, "/api/image/abc123");
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[test]
    fn serializes_camel_case_mime_type() {
        let value = serde_json::to_value(ImageResponse::from(drive_file(None))).unwrap();
        assert_eq!(value["mimeType"], "image/jpeg");
        assert!(value.get("mime_type").is_none());
    }
}
