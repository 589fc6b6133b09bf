//! In-memory content source for testing.

use super::{ContentSource, ContentStream, DriveError};
use crate::models::{FileMetadata, FileRef};
use async_trait::async_trait;
use axum::body::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A file held by [`MockContentSource`], with the chunks its content
/// stream will yield.
#[derive(Debug, Clone)]
pub struct MockFile {
    pub file: FileRef,
    pub chunks: Vec<Bytes>,
    /// Emit a stream error after this many chunks instead of completing.
    pub fail_after: Option<usize>,
}

impl MockFile {
    pub fn new(id: &str, name: &str, mime_type: &str) -> Self {
        Self {
            file: FileRef {
                id: id.to_string(),
                name: name.to_string(),
                mime_type: mime_type.to_string(),
                thumbnail_link: None,
            },
            chunks: Vec::new(),
            fail_after: None,
        }
    }

    pub fn with_thumbnail(mut self, link: &str) -> Self {
        self.file.thumbnail_link = Some(link.to_string());
        self
    }

    pub fn with_chunks<I, B>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        self.chunks = chunks.into_iter().map(Into::into).collect();
        self
    }

    pub fn failing_after(mut self, chunks: usize) -> Self {
        self.fail_after = Some(chunks);
        self
    }
}

/// Content source serving folders and files from memory.
#[derive(Default)]
pub struct MockContentSource {
    folders: Mutex<HashMap<String, Vec<String>>>,
    files: Mutex<HashMap<String, MockFile>>,
    list_failures: Mutex<Vec<String>>,
    streams_opened: AtomicUsize,
}

impl MockContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a file in a folder; listing order follows insertion order.
    pub fn insert(&self, folder_id: &str, file: MockFile) {
        let id = file.file.id.clone();
        self.folders
            .lock()
            .unwrap()
            .entry(folder_id.to_string())
            .or_default()
            .push(id.clone());
        self.files.lock().unwrap().insert(id, file);
    }

    /// Make every listing of `folder_id` fail.
    pub fn fail_listing(&self, folder_id: &str) {
        self.list_failures
            .lock()
            .unwrap()
            .push(folder_id.to_string());
    }

    /// Number of content streams opened so far.
    pub fn streams_opened(&self) -> usize {
        self.streams_opened.load(Ordering::SeqCst)
    }

    fn lookup(&self, file_id: &str) -> Result<MockFile, DriveError> {
        self.files
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| DriveError::NotFound(file_id.to_string()))
    }
}

#[async_trait]
impl ContentSource for MockContentSource {
    async fn list_folder(&self, folder_id: &str) -> Result<Vec<FileRef>, DriveError> {
        if self.list_failures.lock().unwrap().iter().any(|f| f == folder_id) {
            return Err(DriveError::Api {
                status: 403,
                message: "quota exceeded".to_string(),
            });
        }

        let ids = self
            .folders
            .lock()
            .unwrap()
            .get(folder_id)
            .cloned()
            .unwrap_or_default();
        let files = self.files.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| files.get(id).map(|f| f.file.clone()))
            .collect())
    }

    async fn get_metadata(&self, file_id: &str) -> Result<FileMetadata, DriveError> {
        let file = self.lookup(file_id)?.file;
        Ok(FileMetadata {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            thumbnail_link: file.thumbnail_link,
        })
    }

    async fn open_content_stream(&self, file_id: &str) -> Result<ContentStream, DriveError> {
        let file = self.lookup(file_id)?;
        self.streams_opened.fetch_add(1, Ordering::SeqCst);

        let mut items: Vec<Result<Bytes, DriveError>> = match file.fail_after {
            Some(n) => file.chunks.into_iter().take(n).map(Ok).collect(),
            None => file.chunks.into_iter().map(Ok).collect(),
        };
        if file.fail_after.is_some() {
            items.push(Err(DriveError::Stream("connection reset".to_string())));
        }

        Ok(Box::pin(futures::stream::iter(items)))
    }
}
