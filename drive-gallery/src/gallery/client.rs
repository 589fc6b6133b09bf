//! Gateway client used by the gallery.

use super::{GalleryApi, GalleryError};
use crate::models::{ThumbnailEntry, TranscriptionResponse};
use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::{Client, Response};

/// Where the gateway runs during local development.
pub const DEFAULT_GATEWAY_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_TEMPLATE_PATH: &str = "/static/magnify.html";

pub struct HttpGalleryApi {
    origin: String,
    template_path: String,
    client: Client,
}

impl Default for HttpGalleryApi {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_ORIGIN)
    }
}

impl HttpGalleryApi {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            template_path: DEFAULT_TEMPLATE_PATH.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_template_path(mut self, path: impl Into<String>) -> Self {
        self.template_path = path.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    /// GET `path`, failing on any non-OK status.
    async fn get_ok(&self, path: &str) -> Result<Response, GalleryError> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GalleryError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            tracing::warn!(url = %url, status = %response.status(), "Gateway request failed");
            return Err(GalleryError::Http {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl GalleryApi for HttpGalleryApi {
    async fn list_thumbnails(&self, folder_id: &str) -> Result<Vec<ThumbnailEntry>, GalleryError> {
        self.get_ok(&format!("/thumbnails/{}", folder_id))
            .await?
            .json()
            .await
            .map_err(|e| GalleryError::Transport(e.to_string()))
    }

    async fn fetch_blob(&self, file_id: &str) -> Result<Bytes, GalleryError> {
        self.get_ok(&format!("/file/{}", file_id))
            .await?
            .bytes()
            .await
            .map_err(|e| GalleryError::Transport(e.to_string()))
    }

    async fn transcribe(&self, file_id: &str) -> Result<String, GalleryError> {
        let body: TranscriptionResponse = self
            .get_ok(&format!("/transcribe/{}", file_id))
            .await?
            .json()
            .await
            .map_err(|e| GalleryError::Transport(e.to_string()))?;
        Ok(body.transcription)
    }

    async fn fetch_template(&self) -> Result<String, GalleryError> {
        self.get_ok(&self.template_path)
            .await?
            .text()
            .await
            .map_err(|e| GalleryError::Transport(e.to_string()))
    }
}
