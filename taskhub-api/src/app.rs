/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware. Dependencies (pool, config, object store) are
/// constructed once at startup and handed to handlers through the state.
/// There are no ambient singletons.
///
/// # Example
///
/// ```no_run
/// use taskhub_api::{app::AppState, config::Config};
/// use taskhub_shared::storage::ObjectStore;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let storage = ObjectStore::from_env(config.aws.s3_bucket.clone()).await;
/// let state = AppState::new(pool, config, storage);
/// let app = taskhub_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::auth::require_auth};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskhub_shared::storage::ObjectStore;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Body limit for attachment uploads: the 5 MiB file cap plus headroom for
/// multipart framing
const UPLOAD_BODY_LIMIT: usize = 5 * 1024 * 1024 + 16 * 1024;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Object store for task attachments
    pub storage: ObjectStore,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, storage: ObjectStore) -> Self {
        Self {
            db,
            config: Arc::new(config),
            storage,
        }
    }

    /// Gets the token signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                                  # Health check (public)
/// └── /api/
///     ├── /users/
///     │   ├── POST /register                   # public
///     │   ├── POST /login                      # public
///     │   └── GET  /profile                    # bearer
///     ├── /projects/                           # bearer
///     │   ├── POST   /
///     │   ├── GET    /
///     │   ├── GET    /:id
///     │   ├── PUT    /:id
///     │   └── DELETE /:id
///     ├── /tasks/                              # bearer
///     │   ├── POST   /
///     │   ├── GET    /project/:project_id
///     │   ├── PUT    /:id
///     │   ├── PATCH  /:id/status
///     │   └── DELETE /:id
///     └── /files/                              # bearer, multipart upload
///         ├── POST /tasks/:task_id/attachment
///         └── GET  /tasks/:task_id/attachment
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Registration and login are the only unauthenticated API routes
    let public_user_routes = Router::new()
        .route("/register", post(routes::users::register))
        .route("/login", post(routes::users::login));

    let protected_user_routes = Router::new()
        .route("/profile", get(routes::users::profile))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let project_routes = Router::new()
        .route("/", post(routes::projects::create_project))
        .route("/", get(routes::projects::list_projects))
        .route("/:id", get(routes::projects::get_project))
        .route("/:id", put(routes::projects::update_project))
        .route("/:id", delete(routes::projects::delete_project))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route("/project/:project_id", get(routes::tasks::list_tasks))
        .route("/:id", put(routes::tasks::update_task))
        .route("/:id/status", patch(routes::tasks::update_task_status))
        .route("/:id", delete(routes::tasks::delete_task))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let file_routes = Router::new()
        .route(
            "/tasks/:task_id/attachment",
            post(routes::files::upload_attachment),
        )
        .route(
            "/tasks/:task_id/attachment",
            get(routes::files::get_attachment_url),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let api_routes = Router::new()
        .nest("/users", public_user_routes.merge(protected_user_routes))
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes)
        .nest("/files", file_routes);

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
