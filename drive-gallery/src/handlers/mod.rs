//! HTTP handlers for the gallery gateway.

pub mod files;
pub mod health;
pub mod transcribe;

pub use files::{get_file, get_thumbnail, list_root, list_thumbnails};
pub use health::health_check;
pub use transcribe::transcribe_file;
