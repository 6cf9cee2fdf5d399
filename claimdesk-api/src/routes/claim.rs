//! Claim REST API Routes
//!
//! Search, fetch, and field-level update of claim records. Updates run the
//! normalize → diff → persist → change-log pipeline and invalidate the
//! claim's cached history.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use claimdesk_core::{normalize_patch, Claim, ClaimId, Envelope};

use crate::{
    db::DbClient,
    error::{ApiError, ApiResult},
    history_cache::HistoryCache,
    types::{ClaimsQuery, UpdateClaimRequest},
};

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for claim routes.
#[derive(Clone)]
pub struct ClaimState {
    pub db: DbClient,
    pub history_cache: Arc<HistoryCache>,
}

impl ClaimState {
    pub fn new(db: DbClient, history_cache: Arc<HistoryCache>) -> Self {
        Self { db, history_cache }
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/claims - Search claims
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/claims",
    tag = "Claims",
    params(ClaimsQuery),
    responses(
        (status = 200, description = "Matching claims, newest first", body = Envelope<Vec<Claim>>),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
))]
pub async fn list_claims(
    State(state): State<Arc<ClaimState>>,
    Query(params): Query<ClaimsQuery>,
) -> ApiResult<impl IntoResponse> {
    let claims = state.db.claim_search(&params.into_filters()).await?;
    Ok(Json(Envelope::ok(claims)))
}

/// GET /api/claims/{id} - Get claim by id
///
/// A missing claim is not an error here: the response succeeds with null
/// data, matching the envelope contract list views rely on.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/claims/{id}",
    tag = "Claims",
    params(("id" = i64, Path, description = "Claim id")),
    responses(
        (status = 200, description = "The claim, or null when unknown", body = Envelope<Claim>),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
))]
pub async fn get_claim(
    State(state): State<Arc<ClaimState>>,
    Path(id): Path<ClaimId>,
) -> ApiResult<impl IntoResponse> {
    let claim = state.db.claim_get(id).await?;
    Ok(Json(Envelope::ok_or_null(claim)))
}

/// PUT /api/claims/{id} - Apply a partial update
///
/// The body carries the acting user (`user_id`, `username`) plus any subset
/// of canonical claim fields. Fields are normalized (numeric coercion, date
/// canonicalization, legacy-key stripping) before the transactional
/// diff-and-log sequence runs.
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/api/claims/{id}",
    tag = "Claims",
    params(("id" = i64, Path, description = "Claim id")),
    request_body = UpdateClaimRequest,
    responses(
        (status = 200, description = "Full updated claim", body = Envelope<Claim>),
        (status = 400, description = "Missing identity fields or invalid values", body = ApiError),
        (status = 404, description = "Claim not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
))]
pub async fn update_claim(
    State(state): State<Arc<ClaimState>>,
    Path(id): Path<ClaimId>,
    Json(req): Json<UpdateClaimRequest>,
) -> ApiResult<impl IntoResponse> {
    let actor = req.actor()?;
    let patch = normalize_patch(&req.fields).map_err(ApiError::from)?;

    let claim = state.db.claim_update(id, &patch, &actor).await?;

    // The audit trail for this claim just changed.
    state.history_cache.invalidate(id);

    Ok(Json(Envelope::ok(claim)))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the claim routes router.
pub fn create_router(db: DbClient, history_cache: Arc<HistoryCache>) -> axum::Router {
    let state = Arc::new(ClaimState::new(db, history_cache));

    axum::Router::new()
        .route("/", axum::routing::get(list_claims))
        .route("/:id", axum::routing::get(get_claim))
        .route("/:id", axum::routing::put(update_claim))
        .with_state(state)
}
