use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// The complete content of one file, base64 encoded, with its MIME type.
///
/// Only ever built from a fully consumed content stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub data: String,
    pub mime_type: String,
}

impl EncodedPayload {
    pub fn encode(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data: STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Size of the encoded data in bytes.
    pub fn encoded_len(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionResult {
    pub text: String,
}

/// Body of a successful `/transcribe/:fileId` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub transcription: String,
}

impl From<TranscriptionResult> for TranscriptionResponse {
    fn from(result: TranscriptionResult) -> Self {
        Self {
            transcription: result.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_preserves_every_byte() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let payload = EncodedPayload::encode(&bytes, "image/png");

        assert_eq!(STANDARD.decode(&payload.data).unwrap(), bytes);
        assert_eq!(payload.mime_type, "image/png");
    }

    #[test]
    fn empty_content_encodes_to_empty_string() {
        let payload = EncodedPayload::encode(&[], "image/gif");
        assert_eq!(payload.data, "");
        assert_eq!(payload.encoded_len(), 0);
    }
}
