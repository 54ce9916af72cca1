/// Task attachment endpoints
///
/// Uploads go straight to object storage; download requests answer with a
/// short-lived presigned URL instead of proxying bytes through the API.
/// Both routes sit behind the same ownership chain as the task routes.
///
/// # Endpoints
///
/// - `POST /api/files/tasks/:task_id/attachment` - Upload (multipart, 5 MiB cap)
/// - `GET /api/files/tasks/:task_id/attachment` - Mint a presigned download URL

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::CurrentUser,
    routes::load_owned_task,
};
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use taskhub_shared::{
    models::task::Task,
    storage::{attachment_key, DOWNLOAD_URL_TTL},
};
use tracing::info;
use uuid::Uuid;

/// Maximum accepted attachment size: 5 MiB
const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// Upload confirmation
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Human-readable confirmation
    pub message: String,

    /// Storage key the file was stored under
    pub attachment_key: String,
}

/// Presigned download URL response
#[derive(Debug, Serialize)]
pub struct DownloadUrlResponse {
    /// Time-limited presigned URL
    pub url: String,

    /// Seconds until the URL expires
    pub expires_in_seconds: u64,
}

/// Upload a task attachment
///
/// Expects a multipart body with a `file` field. The object is stored
/// privately under a task-scoped key and the key replaces any previous
/// attachment on the task.
///
/// # Errors
///
/// - `400 Bad Request`: no `file` field, or the file exceeds 5 MiB
/// - `404 Not Found` / `403 Forbidden`: as for other task routes
pub async fn upload_attachment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    load_owned_task(&state, task_id, user.id).await?;

    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .unwrap_or("attachment")
            .to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

        upload = Some((filename, content_type, data));
        break;
    }

    let (filename, content_type, data) =
        upload.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    if data.len() > MAX_ATTACHMENT_BYTES {
        return Err(ApiError::BadRequest(
            "File exceeds the 5 MiB size limit".to_string(),
        ));
    }

    let key = attachment_key(task_id, &filename);

    state.storage.upload(&key, data, &content_type).await?;

    Task::set_attachment(&state.db, task_id, &key)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    info!(%task_id, key, "Attachment uploaded");

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        attachment_key: key,
    }))
}

/// Mint a presigned download URL for a task's attachment
///
/// # Errors
///
/// - `404 Not Found`: task absent, or the task has no attachment
/// - `403 Forbidden`: task under someone else's project
pub async fn get_attachment_url(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<DownloadUrlResponse>> {
    let task = load_owned_task(&state, task_id, user.id).await?;

    let key = task
        .task
        .attachment_key
        .as_deref()
        .ok_or_else(|| ApiError::NotFound("No attachment found".to_string()))?;

    let url = state
        .storage
        .presigned_download_url(key, DOWNLOAD_URL_TTL)
        .await?;

    Ok(Json(DownloadUrlResponse {
        url,
        expires_in_seconds: DOWNLOAD_URL_TTL.as_secs(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limit_is_five_mib() {
        assert_eq!(MAX_ATTACHMENT_BYTES, 5 * 1024 * 1024);
    }

    #[test]
    fn test_download_response_shape() {
        let response = DownloadUrlResponse {
            url: "https://example.com/signed".to_string(),
            expires_in_seconds: DOWNLOAD_URL_TTL.as_secs(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["expires_in_seconds"], 900);
    }
}
