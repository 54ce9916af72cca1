/// Health check endpoint
///
/// Always answers 200; a failing database probe is reported in the body
/// (`"status": "degraded"`) rather than as an error status, so load
/// balancers can distinguish "down" from "up but impaired".

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskhub_shared::db::pool::health_check as db_health_check;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded"
    pub status: String,

    /// Application version
    pub version: String,

    /// Database probe result: "connected" or "disconnected"
    pub database: String,
}

/// Reports service health and database connectivity
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database_up = db_health_check(&state.db).await.is_ok();

    Ok(Json(HealthResponse {
        status: if database_up { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if database_up { "connected" } else { "disconnected" }.to_string(),
    }))
}
