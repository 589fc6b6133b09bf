//! Stream -> buffer -> encode -> infer, for one file per call.

use crate::models::{is_image, EncodedPayload, TranscriptionResult};
use crate::services::drive::{ContentSource, ContentStream, DriveError};
use crate::services::providers::{InferenceProvider, ProviderError};
use futures::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;

#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("Failed to retrieve file: {0}")]
    Retrieval(#[from] DriveError),

    #[error("Inference failed: {0}")]
    Inference(#[from] ProviderError),
}

/// Produces transcriptions from a content source and an inference provider.
///
/// Holds no per-request state; concurrent calls are independent.
#[derive(Clone)]
pub struct TranscriptionPipeline {
    content: Arc<dyn ContentSource>,
    inference: Arc<dyn InferenceProvider>,
}

impl TranscriptionPipeline {
    pub fn new(content: Arc<dyn ContentSource>, inference: Arc<dyn InferenceProvider>) -> Self {
        Self { content, inference }
    }

    /// Transcribe the image stored under `file_id`.
    ///
    /// The content stream is only opened once the MIME type is known to be
    /// an image, and inference only runs on a fully consumed stream.
    pub async fn transcribe(
        &self,
        file_id: &str,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let span = tracing::info_span!("transcribe", file_id = %file_id);
        self.run(file_id).instrument(span).await
    }

    async fn run(&self, file_id: &str) -> Result<TranscriptionResult, TranscriptionError> {
        let metadata = self.content.get_metadata(file_id).await?;
        if !is_image(&metadata.mime_type) {
            return Err(TranscriptionError::UnsupportedMedia(metadata.mime_type));
        }

        let stream = self.content.open_content_stream(file_id).await?;
        let payload = buffer_payload(stream, metadata.mime_type).await?;

        let text = self.inference.generate_transcription(&payload).await?;
        tracing::info!(text_len = text.len(), "Transcription completed");

        Ok(TranscriptionResult { text })
    }
}

/// Drain `stream` into one buffer and encode it.
///
/// Chunks are appended in arrival order. An error item ends consumption and
/// the partial buffer is dropped with it.
pub async fn buffer_payload(
    mut stream: ContentStream,
    mime_type: String,
) -> Result<EncodedPayload, DriveError> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut chunks = 0usize;

    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => {
                buffer.extend_from_slice(&chunk);
                chunks += 1;
            }
            Err(e) => {
                tracing::warn!(
                    chunks,
                    buffered = buffer.len(),
                    error = %e,
                    "Content stream failed before completion"
                );
                return Err(e);
            }
        }
    }

    tracing::debug!(chunks, bytes = buffer.len(), "Content stream completed");
    Ok(EncodedPayload::encode(&buffer, mime_type))
}
