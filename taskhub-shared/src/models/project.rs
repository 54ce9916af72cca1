/// Project model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Every project has exactly one owner, fixed at creation. All lookups used
/// by the API are scoped to the owner: a project that exists but belongs to
/// someone else is indistinguishable from one that doesn't exist. Deleting a
/// project cascades to its tasks at the schema level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::task::Task;

/// Project owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project id
    pub id: Uuid,

    /// Project title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Owning user (immutable after creation)
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// Project title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Owning user
    pub owner_id: Uuid,
}

/// Input for updating a project
///
/// `title` is only overwritten when present. `description` uses a nested
/// option: `None` leaves it untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    /// New title
    pub title: Option<String>,

    /// New description (`Some(None)` to clear)
    pub description: Option<Option<String>>,
}

/// A project together with its tasks, newest first
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithTasks {
    /// The project itself
    #[serde(flatten)]
    pub project: Project,

    /// Tasks belonging to the project
    pub tasks: Vec<Task>,
}

impl Project {
    /// Creates a new project owned by `owner_id`
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (title, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, owner_id, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Lists all projects owned by a user, newest first
    pub async fn list_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, owner_id, created_at
            FROM projects
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Finds a project by id, scoped to its owner
    ///
    /// Returns `None` both when the project doesn't exist and when it
    /// belongs to a different user.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, owner_id, created_at
            FROM projects
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Finds an owner-scoped project together with its tasks, newest first
    pub async fn find_with_tasks(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<ProjectWithTasks>, sqlx::Error> {
        let Some(project) = Self::find_for_owner(pool, id, owner_id).await? else {
            return Ok(None);
        };

        let tasks = Task::list_for_project(pool, project.id).await?;

        Ok(Some(ProjectWithTasks { project, tasks }))
    }

    /// Updates an owner-scoped project
    ///
    /// Only fields present in `data` are overwritten; `description` accepts
    /// an explicit clear. Returns `None` when the project doesn't exist or
    /// belongs to a different user.
    pub async fn update_for_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let set_description = data.description.is_some();
        let description = data.description.flatten();

        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET title = COALESCE($3, title),
                description = CASE WHEN $4 THEN $5 ELSE description END
            WHERE id = $1 AND owner_id = $2
            RETURNING id, title, description, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(data.title)
        .bind(set_description)
        .bind(description)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Deletes an owner-scoped project and, via cascade, its tasks
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_for_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_project_default_touches_nothing() {
        let update = UpdateProject::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
    }

    #[test]
    fn test_project_with_tasks_flattens_project_fields() {
        let project = Project {
            id: Uuid::new_v4(),
            title: "Launch".to_string(),
            description: None,
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(ProjectWithTasks {
            project,
            tasks: vec![],
        })
        .unwrap();

        assert_eq!(json["title"], "Launch");
        assert!(json["tasks"].as_array().unwrap().is_empty());
    }
}
