//! File records as reported by the storage provider and the projections
//! the gateway hands out.

use serde::{Deserialize, Serialize};

/// MIME prefix shared by every file the gallery can display or transcribe.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Returns true when the MIME type names an image.
pub fn is_image(mime_type: &str) -> bool {
    mime_type.starts_with(IMAGE_MIME_PREFIX)
}

/// A child of a folder, as listed by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_link: Option<String>,
}

/// Single-file metadata lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_link: Option<String>,
}

/// `{id, name}` projection used by the root folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub id: String,
    pub name: String,
}

impl From<FileRef> for FileSummary {
    fn from(file: FileRef) -> Self {
        Self {
            id: file.id,
            name: file.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailEntry {
    pub id: String,
    pub name: String,
    pub thumbnail_url: String,
}

impl ThumbnailEntry {
    /// Project a listed file, dropping non-images and files without a
    /// thumbnail link.
    pub fn from_listed(file: FileRef) -> Option<Self> {
        if !is_image(&file.mime_type) {
            return None;
        }
        let thumbnail_url = file.thumbnail_link?;
        Some(Self {
            id: file.id,
            name: file.name,
            thumbnail_url,
        })
    }

    /// Project a metadata lookup; `None` when the provider has no thumbnail.
    pub fn from_metadata(metadata: FileMetadata) -> Option<Self> {
        let thumbnail_url = metadata.thumbnail_link?;
        Some(Self {
            id: metadata.id,
            name: metadata.name,
            thumbnail_url,
        })
    }

    /// Filter a listing down to image thumbnails, keeping provider order.
    pub fn collect_images(files: impl IntoIterator<Item = FileRef>) -> Vec<Self> {
        files.into_iter().filter_map(Self::from_listed).collect()
    }
}
