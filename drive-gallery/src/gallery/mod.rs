//! Gallery controller.
//!
//! Drives a gallery view against the gateway: folder selection, thumbnail
//! or full-image rendering, and the magnified view with its transcription.
//! Rendering goes through [`DisplaySurface`], so the same state machine can
//! back a browser binding or the in-memory surface used in tests.

pub mod client;
pub mod controller;
pub mod magnify;
pub mod surface;

pub use client::HttpGalleryApi;
pub use controller::{GalleryController, GalleryState, ViewMode};
pub use surface::{DisplaySurface, ImageSource, ImageTile, MemorySurface, ObjectUrl, WindowHandle};

use crate::models::ThumbnailEntry;
use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("No folder selected")]
    NoFolderSelected,

    #[error("Request to {url} failed with status {status}")]
    Http { status: u16, url: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Display anchor not found: {0}")]
    MissingAnchor(String),

    #[error("Failed to open viewer window")]
    WindowBlocked,

    #[error("Unknown viewer window")]
    UnknownWindow,
}

/// The gateway operations the gallery depends on.
#[async_trait]
pub trait GalleryApi: Send + Sync {
    async fn list_thumbnails(&self, folder_id: &str) -> Result<Vec<ThumbnailEntry>, GalleryError>;

    async fn fetch_blob(&self, file_id: &str) -> Result<Bytes, GalleryError>;

    async fn transcribe(&self, file_id: &str) -> Result<String, GalleryError>;

    /// HTML for the magnified view, with the literal placeholder tokens.
    async fn fetch_template(&self) -> Result<String, GalleryError>;
}
