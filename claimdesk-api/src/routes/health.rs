//! Health check endpoint.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::db::DbClient;

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub pool_size: usize,
}

/// GET /health - Liveness plus a database ping
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service health", body = HealthResponse))
))]
pub async fn health(State(db): State<Arc<DbClient>>) -> impl IntoResponse {
    let database = match db.ping().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::warn!("health check database ping failed: {}", e);
            "down"
        }
    };

    Json(HealthResponse {
        status: "ok",
        database,
        pool_size: db.pool_size(),
    })
}

/// Create the health routes router.
pub fn create_router(db: DbClient) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(Arc::new(db))
}
