//! Mock provider implementation for testing.

use super::{InferenceProvider, ProviderError};
use crate::models::EncodedPayload;
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock inference provider that records every payload it receives.
pub struct MockInferenceProvider {
    enabled: bool,
    reply: String,
    calls: Mutex<Vec<EncodedPayload>>,
}

impl MockInferenceProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            reply: "Mock transcription".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(mut self, reply: &str) -> Self {
        self.reply = reply.to_string();
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Payloads received so far, in call order.
    pub fn calls(&self) -> Vec<EncodedPayload> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceProvider for MockInferenceProvider {
    async fn generate_transcription(
        &self,
        payload: &EncodedPayload,
    ) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(payload.clone());

        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock inference provider not enabled".to_string(),
            ));
        }

        Ok(self.reply.clone())
    }
}
