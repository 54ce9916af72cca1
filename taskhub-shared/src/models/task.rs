/// Task model and database operations
///
/// Tasks are the leaves of the ownership chain: a task belongs to exactly
/// one project, and for authorization purposes its effective owner is the
/// project's owner, never its assignee. The assignee is a non-owning
/// reference used only for display and reminder routing.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     due_date TIMESTAMPTZ,
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     assignee_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     attachment_key VARCHAR(512),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::models::task::{CreateTask, Task};
/// use taskhub_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Write doc".to_string(),
///     description: None,
///     project_id: Uuid::new_v4(),
///     due_date: None,
///     assignee_id: None,
/// }).await?;
///
/// // Load with the project owner for an authorization check
/// let with_owner = Task::find_with_owner(&pool, task.id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

/// Task status
///
/// A closed enumeration; anything else is rejected at the API boundary
/// before a write is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started (the default for new tasks)
    Todo,

    /// Being worked on
    InProgress,

    /// Completed; excluded from due-date reminders
    Done,
}

impl TaskStatus {
    /// Converts status to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(()),
        }
    }
}

/// Task belonging to a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task id
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Parent project (immutable after creation)
    pub project_id: Uuid,

    /// Optional assignee (non-owning reference)
    pub assignee_id: Option<Uuid>,

    /// Storage key of the single attachment, if any.
    /// A new upload overwrites this; superseded objects are not deleted.
    pub attachment_key: Option<String>,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Parent project
    pub project_id: Uuid,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Optional assignee
    pub assignee_id: Option<Uuid>,
}

/// Input for updating a task
///
/// Fields are only overwritten when present. `description` and `assignee_id`
/// use nested options so an explicit clear (`Some(None)`) is distinguishable
/// from "leave untouched" (`None`).
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description (`Some(None)` to clear)
    pub description: Option<Option<String>>,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New assignee (`Some(None)` to unassign)
    pub assignee_id: Option<Option<Uuid>>,
}

/// A task joined with its project's owner
///
/// This is the unit of the ownership-chain check: controllers load a task
/// with `find_with_owner` and compare `owner_id` against the caller.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskWithOwner {
    /// The task itself
    #[sqlx(flatten)]
    pub task: Task,

    /// Id of the user owning the task's parent project
    pub owner_id: Uuid,
}

/// A due task with everything the reminder job needs to address an email
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DueTaskReminder {
    /// Task id
    pub task_id: Uuid,

    /// Task title
    pub title: String,

    /// Current status
    pub status: TaskStatus,

    /// Title of the parent project
    pub project_title: String,

    /// Project owner's email (fallback recipient)
    pub owner_email: String,

    /// Project owner's display name
    pub owner_name: String,

    /// Assignee's email, if assigned (preferred recipient)
    pub assignee_email: Option<String>,

    /// Assignee's display name, if assigned
    pub assignee_name: Option<String>,
}

impl DueTaskReminder {
    /// The email recipient: the assignee if present, otherwise the project owner
    pub fn recipient(&self) -> (&str, &str) {
        match (&self.assignee_email, &self.assignee_name) {
            (Some(email), Some(name)) => (email.as_str(), name.as_str()),
            _ => (self.owner_email.as_str(), self.owner_name.as_str()),
        }
    }
}

impl Task {
    /// Creates a new task in `todo` status
    ///
    /// The caller is responsible for having verified that the project
    /// belongs to the current user and that the assignee, if any, exists.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, project_id, due_date, assignee_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, status, due_date, project_id,
                      assignee_id, attachment_key, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.project_id)
        .bind(data.due_date)
        .bind(data.assignee_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks for a project, newest first
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, due_date, project_id,
                   assignee_id, attachment_key, created_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds a task by id, joined with its project's owner
    ///
    /// Loads the task unscoped, so callers can distinguish "task absent"
    /// (`None`) from "task exists but owned by someone else" (owner_id
    /// mismatch) and answer 404 vs 403 accordingly.
    pub async fn find_with_owner(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<TaskWithOwner>, sqlx::Error> {
        let task = sqlx::query_as::<_, TaskWithOwner>(
            r#"
            SELECT t.id, t.title, t.description, t.status, t.due_date, t.project_id,
                   t.assignee_id, t.attachment_key, t.created_at,
                   p.owner_id
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE t.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Updates a task
    ///
    /// Only fields present in `data` are overwritten. The query is built
    /// dynamically from the present fields so untouched columns are never
    /// written.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // `id = id` keeps the SET clause non-empty when no fields are present
        let mut query = String::from("UPDATE tasks SET id = id");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.assignee_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assignee_id = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, status, due_date, \
             project_id, assignee_id, attachment_key, created_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(assignee_id) = data.assignee_id {
            q = q.bind(assignee_id);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Updates only a task's status
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $2
            WHERE id = $1
            RETURNING id, title, description, status, due_date, project_id,
                      assignee_id, attachment_key, created_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Overwrites a task's attachment key
    pub async fn set_attachment(
        pool: &PgPool,
        id: Uuid,
        attachment_key: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET attachment_key = $2
            WHERE id = $1
            RETURNING id, title, description, status, due_date, project_id,
                      assignee_id, attachment_key, created_at
            "#,
        )
        .bind(id)
        .bind(attachment_key)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Permanently deletes a task
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Finds tasks due within `[from, to)` that are not done, with the
    /// project title, owner, and assignee needed to address a reminder
    pub async fn find_due_between(
        pool: &PgPool,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DueTaskReminder>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, DueTaskReminder>(
            r#"
            SELECT t.id AS task_id, t.title, t.status,
                   p.title AS project_title,
                   o.email AS owner_email, o.name AS owner_name,
                   a.email AS assignee_email, a.name AS assignee_name
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            JOIN users o ON o.id = p.owner_id
            LEFT JOIN users a ON a.id = t.assignee_id
            WHERE t.due_date >= $1
              AND t.due_date < $2
              AND t.status <> 'done'
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(TaskStatus::from_str(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(TaskStatus::from_str("archived").is_err());
        assert!(TaskStatus::from_str("DONE").is_err());
        assert!(TaskStatus::from_str("").is_err());
    }

    #[test]
    fn test_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let parsed: TaskStatus = serde_json::from_str("\"todo\"").unwrap();
        assert_eq!(parsed, TaskStatus::Todo);
    }

    #[test]
    fn test_invalid_status_json_rejected() {
        assert!(serde_json::from_str::<TaskStatus>("\"blocked\"").is_err());
    }

    #[test]
    fn test_reminder_recipient_prefers_assignee() {
        let mut reminder = DueTaskReminder {
            task_id: Uuid::new_v4(),
            title: "Write doc".to_string(),
            status: TaskStatus::Todo,
            project_title: "Launch".to_string(),
            owner_email: "owner@example.com".to_string(),
            owner_name: "Alice".to_string(),
            assignee_email: Some("bob@example.com".to_string()),
            assignee_name: Some("Bob".to_string()),
        };

        assert_eq!(reminder.recipient(), ("bob@example.com", "Bob"));

        reminder.assignee_email = None;
        reminder.assignee_name = None;
        assert_eq!(reminder.recipient(), ("owner@example.com", "Alice"));
    }

    #[test]
    fn test_update_task_default_touches_nothing() {
        let update = UpdateTask::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.due_date.is_none());
        assert!(update.status.is_none());
        assert!(update.assignee_id.is_none());
    }
}
