//! User REST API Routes
//!
//! Login plus account management. Credentials are verified against the
//! `users` table; the account routes require an admin token (enforcement is
//! skipped under the `dev` feature, where requests carry no claims).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;

use claimdesk_core::{Envelope, UserAccount, UserId, UserRole};

use crate::{
    auth::{self, AuthConfig, Claims},
    db::DbClient,
    error::{ApiError, ApiResult},
    types::{CreateUserRequest, LoginRequest, LoginResponse, UpdateUserRequest},
    validation::ValidateNonEmpty,
};

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for user routes.
#[derive(Clone)]
pub struct UserState {
    pub db: DbClient,
    pub auth: Arc<AuthConfig>,
}

impl UserState {
    pub fn new(db: DbClient, auth: Arc<AuthConfig>) -> Self {
        Self { db, auth }
    }
}

/// Reject non-admin callers. Requests without claims (dev feature) pass.
fn require_admin(claims: &Option<Extension<Claims>>) -> ApiResult<()> {
    match claims {
        Some(Extension(claims)) if claims.role != UserRole::Admin => {
            Err(ApiError::forbidden("Admin role required"))
        }
        _ => Ok(()),
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/auth/login - Exchange credentials for a bearer token
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token and account", body = Envelope<LoginResponse>),
        (status = 401, description = "Unknown user or wrong password", body = ApiError),
    )
))]
pub async fn login(
    State(state): State<Arc<UserState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    req.username.validate_non_empty("username")?;
    req.password.validate_non_empty("password")?;

    let Some((user, stored_hash)) = state.db.user_credentials(&req.username).await? else {
        // Same response as a wrong password; do not reveal which part failed.
        return Err(ApiError::unauthorized("Invalid username or password"));
    };

    if !auth::verify_password(&req.password, &stored_hash) {
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let token = auth::issue_token(&user, &state.auth)?;

    tracing::info!(user_id = user.id, username = %user.username, "login");

    Ok(Json(Envelope::ok(LoginResponse { token, user })))
}

/// GET /api/users - List accounts
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All accounts", body = Envelope<Vec<UserAccount>>),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Admin role required", body = ApiError),
    ),
    security(("bearer_auth" = []))
))]
pub async fn list_users(
    State(state): State<Arc<UserState>>,
    claims: Option<Extension<Claims>>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&claims)?;
    let users = state.db.user_list().await?;
    Ok(Json(Envelope::ok(users)))
}

/// POST /api/users - Create an account
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created account", body = Envelope<UserAccount>),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "Username already taken", body = ApiError),
        (status = 403, description = "Admin role required", body = ApiError),
    ),
    security(("bearer_auth" = []))
))]
pub async fn create_user(
    State(state): State<Arc<UserState>>,
    claims: Option<Extension<Claims>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&claims)?;

    req.username.validate_non_empty("username")?;
    req.display_name.validate_non_empty("display_name")?;
    req.password.validate_non_empty("password")?;

    let hash = auth::hash_password(&req.password);
    let user = state
        .db
        .user_create(req.username.trim(), req.display_name.trim(), req.role, &hash)
        .await?;

    Ok((StatusCode::CREATED, Json(Envelope::ok(user))))
}

/// PUT /api/users/{id} - Update an account
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = Envelope<UserAccount>),
        (status = 400, description = "No fields to update", body = ApiError),
        (status = 404, description = "User not found", body = ApiError),
        (status = 403, description = "Admin role required", body = ApiError),
    ),
    security(("bearer_auth" = []))
))]
pub async fn update_user(
    State(state): State<Arc<UserState>>,
    claims: Option<Extension<Claims>>,
    Path(id): Path<UserId>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&claims)?;

    if !req.has_any_updates() {
        return Err(ApiError::invalid_input(
            "At least one field must be provided for update",
        ));
    }

    if let Some(ref display_name) = req.display_name {
        display_name.validate_non_empty("display_name")?;
    }
    if let Some(ref password) = req.password {
        password.validate_non_empty("password")?;
    }

    let hash = req.password.as_deref().map(auth::hash_password);
    let user = state
        .db
        .user_update(id, req.display_name.as_deref(), req.role, hash.as_deref())
        .await?;

    Ok(Json(Envelope::ok(user)))
}

/// DELETE /api/users/{id} - Delete an account
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 404, description = "User not found", body = ApiError),
        (status = 403, description = "Admin role required", body = ApiError),
    ),
    security(("bearer_auth" = []))
))]
pub async fn delete_user(
    State(state): State<Arc<UserState>>,
    claims: Option<Extension<Claims>>,
    Path(id): Path<UserId>,
) -> ApiResult<StatusCode> {
    require_admin(&claims)?;
    state.db.user_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the user account routes router (mounted at /api/users).
pub fn create_router(db: DbClient, auth: Arc<AuthConfig>) -> Router {
    let state = Arc::new(UserState::new(db, auth));

    Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/:id", put(update_user))
        .route("/:id", axum::routing::delete(delete_user))
        .with_state(state)
}

/// Create the login route router (mounted at /api/auth, outside the
/// bearer-token middleware).
pub fn create_auth_router(db: DbClient, auth: Arc<AuthConfig>) -> Router {
    let state = Arc::new(UserState::new(db, auth));

    Router::new().route("/login", post(login))
        .with_state(state)
}
