/// API route handlers
///
/// One module per resource:
///
/// - `health`: Health check endpoint
/// - `users`: Registration, login, profile
/// - `projects`: Project CRUD (owner-scoped)
/// - `tasks`: Task CRUD and status updates
/// - `files`: Attachment upload and presigned download links

use crate::{app::AppState, error::ApiError};
use serde::{Deserialize, Deserializer};
use taskhub_shared::models::task::{Task, TaskWithOwner};
use uuid::Uuid;

pub mod files;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;

/// Loads a task with its project owner and enforces the ownership chain
///
/// A task's effective owner is its parent project's owner, never its
/// assignee. Unlike project lookups, this loads by id alone and then
/// compares owners, so "absent" and "exists but not yours" stay
/// distinguishable.
///
/// # Errors
///
/// - `404 Not Found`: task absent
/// - `403 Forbidden`: task exists under someone else's project
pub(crate) async fn load_owned_task(
    state: &AppState,
    task_id: Uuid,
    caller_id: Uuid,
) -> Result<TaskWithOwner, ApiError> {
    let task = Task::find_with_owner(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if task.owner_id != caller_id {
        return Err(ApiError::Forbidden("Unauthorized".to_string()));
    }

    Ok(task)
}

/// Deserializes a field that distinguishes "absent" from "explicitly null"
///
/// Used with `#[serde(default, deserialize_with = "double_option")]` on an
/// `Option<Option<T>>` field: absent stays `None`, an explicit JSON `null`
/// becomes `Some(None)`, and a value becomes `Some(Some(value))`. This is
/// what lets PUT payloads clear a description or unassign a task.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
