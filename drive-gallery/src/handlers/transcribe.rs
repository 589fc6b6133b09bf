use crate::models::TranscriptionResponse;
use crate::services::TranscriptionError;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;

pub async fn transcribe_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Json<TranscriptionResponse>, AppError> {
    match state.pipeline.transcribe(&file_id).await {
        Ok(result) => Ok(Json(result.into())),
        Err(TranscriptionError::UnsupportedMedia(mime_type)) => {
            tracing::warn!(
                file_id = %file_id,
                mime_type = %mime_type,
                "Rejected transcription of non-image file"
            );
            Err(AppError::BadRequest(anyhow::anyhow!("File is not an image")))
        }
        Err(e @ TranscriptionError::Retrieval(_)) => {
            tracing::error!(
                file_id = %file_id,
                error = %e,
                "Failed to retrieve file for transcription"
            );
            Err(AppError::InternalError(anyhow::anyhow!(
                "Failed to retrieve file from storage"
            )))
        }
        Err(e @ TranscriptionError::Inference(_)) => {
            tracing::error!(file_id = %file_id, error = %e, "Failed to transcribe image");
            Err(AppError::InternalError(anyhow::anyhow!(
                "Failed to transcribe image"
            )))
        }
    }
}
