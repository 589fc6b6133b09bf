pub mod file;
pub mod transcription;

pub use file::{is_image, FileMetadata, FileRef, FileSummary, ThumbnailEntry};
pub use transcription::{EncodedPayload, TranscriptionResponse, TranscriptionResult};
