/// Task endpoints
///
/// All routes enforce the ownership chain through
/// [`load_owned_task`](crate::routes::load_owned_task), which answers 404
/// for an absent task and 403 for one under someone else's project.
///
/// # Endpoints
///
/// - `POST /api/tasks` - Create a task under an owned project
/// - `GET /api/tasks/project/:project_id` - List a project's tasks
/// - `PUT /api/tasks/:id` - Update task fields
/// - `PATCH /api/tasks/:id/status` - Update status only
/// - `DELETE /api/tasks/:id` - Delete the task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::CurrentUser,
    routes::{double_option, load_owned_task},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use taskhub_shared::models::{
    project::Project,
    task::{CreateTask, Task, TaskStatus, UpdateTask},
    user::User,
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Parent project id
    pub project_id: Uuid,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Optional assignee id (must reference an existing user)
    pub assignee_id: Option<Uuid>,
}

/// Update task request
///
/// Fields are applied only when present. `description` and `assignee_id`
/// distinguish an explicit `null` (clear/unassign) from an absent field.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: Option<String>,

    /// New description; explicit `null` clears it
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,

    /// New status (must be one of the closed enumeration)
    pub status: Option<TaskStatus>,

    /// New assignee; explicit `null` unassigns
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<Uuid>>,
}

/// Status-only update request
///
/// The status arrives as a raw string so an out-of-enumeration value can be
/// answered with 400 rather than a generic deserialization failure.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// One of: todo, in_progress, done
    pub status: String,
}

/// Delete confirmation
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Create a task under a project the caller owns
///
/// # Errors
///
/// - `404 Not Found`: project absent or not the caller's; assignee unknown
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    // The target project must pass the owner check first
    Project::find_for_owner(&state.db, req.project_id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    if let Some(assignee_id) = req.assignee_id {
        if !User::exists(&state.db, assignee_id).await? {
            return Err(ApiError::NotFound("Assignee not found".to_string()));
        }
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            project_id: req.project_id,
            due_date: req.due_date,
            assignee_id: req.assignee_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// List a project's tasks, newest first
///
/// # Errors
///
/// - `404 Not Found`: project absent or not the caller's
pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    Project::find_for_owner(&state.db, project_id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let tasks = Task::list_for_project(&state.db, project_id).await?;

    Ok(Json(tasks))
}

/// Update task fields
///
/// # Errors
///
/// - `404 Not Found`: task absent, or named assignee unknown
/// - `403 Forbidden`: task under someone else's project
pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    load_owned_task(&state, id, user.id).await?;

    if let Some(Some(assignee_id)) = req.assignee_id {
        if !User::exists(&state.db, assignee_id).await? {
            return Err(ApiError::NotFound("Assignee not found".to_string()));
        }
    }

    let task = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            status: req.status,
            assignee_id: req.assignee_id,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Update only a task's status
///
/// # Errors
///
/// - `400 Bad Request`: status outside {todo, in_progress, done}; the
///   stored value is left unchanged
/// - `404 Not Found` / `403 Forbidden`: as for other task routes
pub async fn update_task_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Task>> {
    let status = TaskStatus::from_str(&req.status)
        .map_err(|_| ApiError::BadRequest("Invalid status".to_string()))?;

    load_owned_task(&state, id, user.id).await?;

    let task = Task::update_status(&state.db, id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Permanently delete a task
///
/// # Errors
///
/// - `404 Not Found` / `403 Forbidden`: as for other task routes
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    load_owned_task(&state, id, user.id).await?;

    Task::delete(&state.db, id).await?;

    Ok(Json(DeletedResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let absent: UpdateTaskRequest = serde_json::from_str(r#"{"title": "New"}"#).unwrap();
        assert!(absent.assignee_id.is_none());
        assert!(absent.description.is_none());

        let unassign: UpdateTaskRequest =
            serde_json::from_str(r#"{"assignee_id": null}"#).unwrap();
        assert_eq!(unassign.assignee_id, Some(None));

        let id = Uuid::new_v4();
        let assign: UpdateTaskRequest =
            serde_json::from_str(&format!(r#"{{"assignee_id": "{}"}}"#, id)).unwrap();
        assert_eq!(assign.assignee_id, Some(Some(id)));
    }

    #[test]
    fn test_update_request_rejects_bad_status() {
        let result = serde_json::from_str::<UpdateTaskRequest>(r#"{"status": "archived"}"#);
        assert!(result.is_err());

        let ok: UpdateTaskRequest = serde_json::from_str(r#"{"status": "in_progress"}"#).unwrap();
        assert_eq!(ok.status, Some(TaskStatus::InProgress));
    }

    #[test]
    fn test_status_request_parses_only_known_values() {
        for (raw, expected) in [
            ("todo", TaskStatus::Todo),
            ("in_progress", TaskStatus::InProgress),
            ("done", TaskStatus::Done),
        ] {
            assert_eq!(TaskStatus::from_str(raw), Ok(expected));
        }

        assert!(TaskStatus::from_str("blocked").is_err());
    }
}
