//! # Taskhub API Server
//!
//! HTTP server for the Taskhub project/task management service:
//! user registration and login, project and task CRUD, and task
//! attachments backed by object storage.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskhub-api
//! ```

use taskhub_api::{app, config::Config};
use taskhub_shared::{
    db::{migrations::run_migrations, pool::create_pool, pool::DatabaseConfig},
    storage::ObjectStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskhub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskhub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let storage = ObjectStore::from_env(config.aws.s3_bucket.clone()).await;

    let bind_address = config.bind_address();
    let state = app::AppState::new(pool, config, storage);
    let router = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, router).await?;

    Ok(())
}
