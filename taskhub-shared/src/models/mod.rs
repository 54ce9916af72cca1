/// Database models for Taskhub
///
/// This module contains all database models and their CRUD operations.
/// Every read is a fresh query; there is no caching layer. Ownership
/// traversal (task -> project -> owner) is done through named fetch
/// operations so the chain is visible at each call site.
///
/// # Models
///
/// - `user`: User accounts and credentials
/// - `project`: Projects, each owned by exactly one user
/// - `task`: Tasks belonging to a project, optionally assigned to a user
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::models::user::{CreateUser, User};
/// use taskhub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         email: "user@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         name: "Jane Doe".to_string(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod project;
pub mod task;
pub mod user;
