/// Project endpoints
///
/// All routes are owner-scoped: a project that exists but belongs to a
/// different user is answered with the same 404 as a project that doesn't
/// exist, so ids can't be probed.
///
/// # Endpoints
///
/// - `POST /api/projects` - Create a project
/// - `GET /api/projects` - List the caller's projects
/// - `GET /api/projects/:id` - Fetch one project with its tasks
/// - `PUT /api/projects/:id` - Update title/description
/// - `DELETE /api/projects/:id` - Delete the project and its tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::CurrentUser,
    routes::double_option,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use taskhub_shared::models::project::{
    CreateProject, Project, ProjectWithTasks, UpdateProject,
};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Update project request
///
/// `title` is applied only when present. `description` distinguishes an
/// explicit `null` (clear it) from an absent field (leave untouched).
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    /// New title
    pub title: Option<String>,

    /// New description; explicit `null` clears it
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

/// Delete confirmation
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Create a project owned by the caller
pub async fn create_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate()?;

    let project = Project::create(
        &state.db,
        CreateProject {
            title: req.title,
            description: req.description,
            owner_id: user.id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// List the caller's projects, newest first
pub async fn list_projects(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = Project::list_for_owner(&state.db, user.id).await?;

    Ok(Json(projects))
}

/// Fetch one project with its tasks
///
/// # Errors
///
/// - `404 Not Found`: absent, or owned by someone else
pub async fn get_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectWithTasks>> {
    let project = Project::find_with_tasks(&state.db, id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Update a project's title and/or description
///
/// # Errors
///
/// - `404 Not Found`: absent, or owned by someone else
pub async fn update_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let project = Project::update_for_owner(
        &state.db,
        id,
        user.id,
        UpdateProject {
            title: req.title,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Delete a project; its tasks go with it (schema-level cascade)
///
/// # Errors
///
/// - `404 Not Found`: absent, or owned by someone else
pub async fn delete_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = Project::delete_for_owner(&state.db, id, user.id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    Ok(Json(DeletedResponse {
        message: "Project deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let absent: UpdateProjectRequest = serde_json::from_str(r#"{"title": "New"}"#).unwrap();
        assert_eq!(absent.title.as_deref(), Some("New"));
        assert!(absent.description.is_none());

        let cleared: UpdateProjectRequest =
            serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert!(cleared.title.is_none());
        assert_eq!(cleared.description, Some(None));

        let set: UpdateProjectRequest =
            serde_json::from_str(r#"{"description": "details"}"#).unwrap();
        assert_eq!(set.description, Some(Some("details".to_string())));
    }

    #[test]
    fn test_create_request_requires_title() {
        let req = CreateProjectRequest {
            title: String::new(),
            description: None,
        };
        assert!(req.validate().is_err());
    }
}
