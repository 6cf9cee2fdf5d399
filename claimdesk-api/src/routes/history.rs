//! Change-Log REST API Routes
//!
//! Read-side of the audit trail: per-claim history (TTL-cached) and the
//! filterable, paginated global view. An empty history is a successful
//! response carrying an empty list - callers must never render an error
//! banner for a claim that simply has no edits yet.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use claimdesk_core::{ChangeLogEntry, ClaimId, Envelope};

use crate::{
    db::DbClient,
    error::{ApiError, ApiResult},
    history_cache::HistoryCache,
    types::HistoryAllQuery,
};

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for history routes.
#[derive(Clone)]
pub struct HistoryState {
    pub db: DbClient,
    pub cache: Arc<HistoryCache>,
}

impl HistoryState {
    pub fn new(db: DbClient, cache: Arc<HistoryCache>) -> Self {
        Self { db, cache }
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/claims/{id}/history - Change-log entries for one claim
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/claims/{id}/history",
    tag = "History",
    params(("id" = i64, Path, description = "Claim id")),
    responses(
        (status = 200, description = "Entries newest-first; empty list when no edits exist", body = Envelope<Vec<ChangeLogEntry>>),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
))]
pub async fn claim_history(
    State(state): State<Arc<HistoryState>>,
    Path(id): Path<ClaimId>,
) -> ApiResult<impl IntoResponse> {
    if let Some(entries) = state.cache.get(id) {
        return Ok(Json(Envelope::ok(entries)));
    }

    let entries = state.db.history_for_claim(id).await?;
    state.cache.put(id, entries.clone());

    Ok(Json(Envelope::ok(entries)))
}

/// GET /api/claims/history/all - Global change-log view
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/claims/history/all",
    tag = "History",
    params(HistoryAllQuery),
    responses(
        (status = 200, description = "Filtered page of entries, newest-first", body = Envelope<Vec<ChangeLogEntry>>),
        (status = 400, description = "Invalid date filter", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
))]
pub async fn history_all(
    State(state): State<Arc<HistoryState>>,
    Query(params): Query<HistoryAllQuery>,
) -> ApiResult<impl IntoResponse> {
    let (filters, page) = params.into_parts();
    let entries = state.db.history_all(&filters, page).await?;
    Ok(Json(Envelope::ok(entries)))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the history routes router (nested next to the claim routes).
pub fn create_router(db: DbClient, cache: Arc<HistoryCache>) -> axum::Router {
    let state = Arc::new(HistoryState::new(db, cache));

    axum::Router::new()
        .route("/:id/history", axum::routing::get(claim_history))
        .route("/history/all", axum::routing::get(history_all))
        .with_state(state)
}
