pub mod drive;
pub mod providers;
pub mod transcription;

pub use drive::{ContentSource, DriveClient, DriveError};
pub use providers::InferenceProvider;
pub use transcription::{TranscriptionError, TranscriptionPipeline};
