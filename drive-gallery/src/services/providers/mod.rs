//! Inference provider abstractions and implementations.
//!
//! The pipeline talks to [`InferenceProvider`], so the Gemini backend can be
//! swapped for the mock in tests.

pub mod gemini;
pub mod mock;

use crate::models::EncodedPayload;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Empty response")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Trait for image-to-text generation providers (e.g., Gemini).
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Transcribe one complete, encoded image. Single attempt.
    async fn generate_transcription(&self, payload: &EncodedPayload)
        -> Result<String, ProviderError>;
}
