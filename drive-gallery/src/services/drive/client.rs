//! Google Drive v3 REST client.

use super::{ContentSource, ContentStream, DriveError, TokenSource};
use crate::models::{FileMetadata, FileRef, ThumbnailEntry};
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;

/// Google Drive API base URL.
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

const FILE_FIELDS: &str = "id,name,mimeType,thumbnailLink";
const LIST_FIELDS: &str = "files(id,name,mimeType,thumbnailLink)";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileRef>,
}

pub struct DriveClient {
    api_base: String,
    client: Client,
    tokens: Arc<dyn TokenSource>,
}

impl DriveClient {
    pub fn new(api_base: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            tokens,
        }
    }

    fn files_url(&self) -> String {
        format!("{}/files", self.api_base)
    }

    /// Build a URL for a single file, with the id as one path segment.
    fn file_url(&self, file_id: &str) -> Result<reqwest::Url, DriveError> {
        let mut url = reqwest::Url::parse(&self.files_url())
            .map_err(|e| DriveError::Decode(format!("Invalid Drive API base: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| DriveError::Decode("Drive API base cannot be a base URL".to_string()))?
            .push(file_id);
        Ok(url)
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<Response, DriveError> {
        let token = self.tokens.access_token().await?;
        request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DriveError::Network(e.to_string()))
    }

    async fn list(&self, query: String) -> Result<Vec<FileRef>, DriveError> {
        tracing::debug!(query = %query, "Listing Drive files");

        let request = self.client.get(self.files_url()).query(&[
            ("q", query.as_str()),
            ("fields", LIST_FIELDS),
            ("spaces", "drive"),
        ]);
        let response = check_status(self.authorized(request).await?, None).await?;

        let list: FileList = response
            .json()
            .await
            .map_err(|e| DriveError::Decode(format!("Failed to parse file list: {}", e)))?;
        Ok(list.files)
    }
}

/// Quote a value for use inside a Drive search query string literal.
fn quote_query_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

fn children_query(folder_id: &str) -> String {
    format!("{} in parents", quote_query_value(folder_id))
}

/// Map non-success statuses to `DriveError`. A 404 becomes `NotFound` when
/// the request targeted a single file.
async fn check_status(response: Response, file_id: Option<&str>) -> Result<Response, DriveError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = file_id {
            return Err(DriveError::NotFound(id.to_string()));
        }
    }

    let message = response.text().await.unwrap_or_default();
    Err(DriveError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ContentSource for DriveClient {
    async fn list_folder(&self, folder_id: &str) -> Result<Vec<FileRef>, DriveError> {
        self.list(children_query(folder_id)).await
    }

    async fn list_image_thumbnails(
        &self,
        folder_id: &str,
    ) -> Result<Vec<ThumbnailEntry>, DriveError> {
        let query = format!("{} and mimeType contains 'image/'", children_query(folder_id));
        let files = self.list(query).await?;
        Ok(ThumbnailEntry::collect_images(files))
    }

    async fn get_metadata(&self, file_id: &str) -> Result<FileMetadata, DriveError> {
        let request = self
            .client
            .get(self.file_url(file_id)?)
            .query(&[("fields", FILE_FIELDS)]);
        let response = check_status(self.authorized(request).await?, Some(file_id)).await?;

        response
            .json()
            .await
            .map_err(|e| DriveError::Decode(format!("Failed to parse file metadata: {}", e)))
    }

    async fn open_content_stream(&self, file_id: &str) -> Result<ContentStream, DriveError> {
        let request = self
            .client
            .get(self.file_url(file_id)?)
            .query(&[("alt", "media")]);
        let response = check_status(self.authorized(request).await?, Some(file_id)).await?;

        tracing::debug!(
            file_id = %file_id,
            content_length = ?response.content_length(),
            "Opened Drive content stream"
        );

        let stream = response
            .bytes_stream()
            .map_err(|e| DriveError::Stream(e.to_string()));
        Ok(Box::pin(stream))
    }
}
