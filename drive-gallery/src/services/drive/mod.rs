//! Remote content access.
//!
//! [`ContentSource`] is the seam between the gateway and the storage
//! provider. [`DriveClient`] talks to the Google Drive v3 REST API;
//! [`MockContentSource`] serves files from memory for tests.

pub mod auth;
pub mod client;
pub mod mock;

pub use auth::{ServiceAccountKey, ServiceAccountTokenSource, StaticTokenSource, TokenSource};
pub use client::DriveClient;
pub use mock::MockContentSource;

use crate::models::{FileMetadata, FileRef, ThumbnailEntry};
use async_trait::async_trait;
use axum::body::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Error type for storage provider operations.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Drive API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Content stream error: {0}")]
    Stream(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Raw file bytes as they arrive from the provider.
///
/// The stream ends after the last chunk; an `Err` item is terminal.
/// Dropping the stream aborts the underlying transfer.
pub type ContentStream = Pin<Box<dyn Stream<Item = Result<Bytes, DriveError>> + Send>>;

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// List the immediate children of a folder (single page).
    async fn list_folder(&self, folder_id: &str) -> Result<Vec<FileRef>, DriveError>;

    /// List image children that carry a thumbnail link, in provider order.
    async fn list_image_thumbnails(
        &self,
        folder_id: &str,
    ) -> Result<Vec<ThumbnailEntry>, DriveError> {
        let files = self.list_folder(folder_id).await?;
        Ok(ThumbnailEntry::collect_images(files))
    }

    /// Look up a single file; `DriveError::NotFound` for unknown ids.
    async fn get_metadata(&self, file_id: &str) -> Result<FileMetadata, DriveError>;

    /// Open a byte stream over the file's raw content.
    async fn open_content_stream(&self, file_id: &str) -> Result<ContentStream, DriveError>;
}
