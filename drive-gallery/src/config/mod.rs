use crate::services::drive::client::DRIVE_API_BASE;
use crate::services::providers::gemini::GEMINI_API_BASE;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub common: core_config::Config,
    pub drive: DriveConfig,
    pub google: GoogleConfig,
    pub models: ModelConfig,
    pub prompt: PromptConfig,
    pub static_dir: String,
}

#[derive(Debug, Clone)]
pub struct DriveConfig {
    pub api_base: String,
    /// Folder listed by `GET /`.
    pub root_folder_id: String,
    pub credentials: DriveCredentials,
}

/// How Drive requests are authorized.
#[derive(Debug, Clone, PartialEq)]
pub enum DriveCredentials {
    /// Path to a service-account key file.
    ServiceAccount(String),
    /// A pre-issued bearer token.
    AccessToken(String),
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model used for image transcription (e.g., gemini-2.0-flash)
    pub transcription_model: String,
}

#[derive(Debug, Clone)]
pub struct PromptConfig {
    /// Text file holding the instruction sent with every image.
    pub path: String,
}

impl GalleryConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(GalleryConfig {
            common: common_config,
            drive: DriveConfig {
                api_base: get_env("DRIVE_API_BASE", Some(DRIVE_API_BASE), is_prod)?,
                root_folder_id: get_env("DRIVE_ROOT_FOLDER_ID", None, is_prod)?,
                credentials: drive_credentials()?,
            },
            google: GoogleConfig {
                api_key: get_env("GOOGLE_API_KEY", None, is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(GEMINI_API_BASE), is_prod)?,
            },
            models: ModelConfig {
                transcription_model: get_env(
                    "GENAI_TRANSCRIPTION_MODEL",
                    Some("gemini-2.0-flash"),
                    is_prod,
                )?,
            },
            prompt: PromptConfig {
                path: get_env("TRANSCRIPTION_PROMPT_PATH", Some("prompt.txt"), is_prod)?,
            },
            static_dir: get_env("STATIC_DIR", Some("static"), is_prod)?,
        })
    }
}

/// A key file takes precedence over a static token.
fn drive_credentials() -> Result<DriveCredentials, AppError> {
    if let Ok(path) = env::var("DRIVE_CREDENTIALS_PATH") {
        return Ok(DriveCredentials::ServiceAccount(path));
    }
    if let Ok(token) = env::var("DRIVE_ACCESS_TOKEN") {
        return Ok(DriveCredentials::AccessToken(token));
    }
    Err(AppError::ConfigError(anyhow::anyhow!(
        "DRIVE_CREDENTIALS_PATH or DRIVE_ACCESS_TOKEN is required but not set"
    )))
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
