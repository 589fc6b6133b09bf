use crate::models::{FileSummary, ThumbnailEntry};
use crate::startup::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;

/// List `{id, name}` for every file in the configured root folder.
pub async fn list_root(State(state): State<AppState>) -> Result<Json<Vec<FileSummary>>, AppError> {
    let files = state
        .content
        .list_folder(&state.root_folder_id)
        .await
        .map_err(|e| {
            tracing::error!(
                folder_id = %state.root_folder_id,
                error = %e,
                "Failed to list root folder"
            );
            AppError::InternalError(anyhow::anyhow!("Failed to retrieve file list"))
        })?;

    Ok(Json(files.into_iter().map(FileSummary::from).collect()))
}

/// Pipe a file's raw content to the client.
pub async fn get_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Response, AppError> {
    let stream = state
        .content
        .open_content_stream(&file_id)
        .await
        .map_err(|e| {
            tracing::error!(file_id = %file_id, error = %e, "Failed to open file content");
            AppError::InternalError(anyhow::anyhow!("Failed to retrieve file"))
        })?;

    tracing::info!(file_id = %file_id, "Streaming file content");

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        Body::from_stream(stream),
    )
        .into_response())
}

pub async fn get_thumbnail(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Json<ThumbnailEntry>, AppError> {
    let metadata = state.content.get_metadata(&file_id).await.map_err(|e| {
        tracing::error!(file_id = %file_id, error = %e, "Failed to fetch thumbnail metadata");
        AppError::InternalError(anyhow::anyhow!("Failed to retrieve thumbnail"))
    })?;

    ThumbnailEntry::from_metadata(metadata).map(Json).ok_or_else(|| {
        tracing::debug!(file_id = %file_id, "File has no thumbnail");
        AppError::NotFound(anyhow::anyhow!("Thumbnail not available for this file"))
    })
}

pub async fn list_thumbnails(
    State(state): State<AppState>,
    Path(folder_id): Path<String>,
) -> Result<Json<Vec<ThumbnailEntry>>, AppError> {
    let thumbnails = state
        .content
        .list_image_thumbnails(&folder_id)
        .await
        .map_err(|e| {
            tracing::error!(folder_id = %folder_id, error = %e, "Failed to list thumbnails");
            AppError::InternalError(anyhow::anyhow!("Failed to retrieve image thumbnails"))
        })?;

    tracing::debug!(folder_id = %folder_id, count = thumbnails.len(), "Listed thumbnails");
    Ok(Json(thumbnails))
}
