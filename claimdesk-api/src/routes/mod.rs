//! REST API Routes Module
//!
//! Route handlers organized by resource:
//! - Claim search/fetch/update
//! - Change-log history (per-claim and global)
//! - Login and user-account management
//! - Health check
//!
//! `create_api_router` assembles the full application: CORS, request
//! tracing, a per-request timeout, and bearer-token auth on everything
//! under `/api` except login.

pub mod claim;
pub mod health;
pub mod history;
pub mod user;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    Router,
};
use tower_http::cors::{Any, AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{auth_middleware, AuthConfig, AuthState};
use crate::config::ApiConfig;
use crate::db::DbClient;
use crate::history_cache::HistoryCache;

// Re-export route creation functions for convenience
pub use claim::create_router as claim_router;
pub use health::create_router as health_router;
pub use history::create_router as history_router;
pub use user::{create_auth_router as auth_router, create_router as user_router};

// ============================================================================
// CORS
// ============================================================================

fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let max_age = Duration::from_secs(config.cors_max_age_secs);

    if config.cors_origins.is_empty() {
        // Dev mode: any origin.
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .max_age(max_age)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .max_age(max_age)
    }
}

// ============================================================================
// ROUTER ASSEMBLY
// ============================================================================

/// Build the complete API router.
pub fn create_api_router(
    db: DbClient,
    history_cache: Arc<HistoryCache>,
    api_config: &ApiConfig,
    auth_config: AuthConfig,
) -> Router {
    let auth_config = Arc::new(auth_config);

    // /api/claims carries both the claim routes and the history routes.
    let claims = claim_router(db.clone(), history_cache.clone())
        .merge(history_router(db.clone(), history_cache));

    let protected = Router::new()
        .nest("/api/claims", claims)
        .nest("/api/users", user_router(db.clone(), auth_config.clone()));

    // The dev feature exposes the API without bearer tokens.
    let protected = if cfg!(feature = "dev") {
        protected
    } else {
        let auth_state = AuthState {
            config: auth_config.clone(),
        };
        protected.route_layer(from_fn_with_state(auth_state, auth_middleware))
    };

    let router = Router::new()
        .merge(protected)
        .nest("/api/auth", auth_router(db.clone(), auth_config))
        .merge(health_router(db));

    #[cfg(feature = "openapi")]
    let router = router.route(
        "/openapi.json",
        axum::routing::get(|| async { axum::Json(<crate::openapi::ApiDoc as utoipa::OpenApi>::openapi()) }),
    );

    router
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(api_config.request_timeout))
        .layer(build_cors_layer(api_config))
}
