//! Claimdesk API - REST layer for billing-claims administration
//!
//! Exposes claim search/fetch/update, the per-field change-log views, and
//! user-account management over Axum. Storage is PostgreSQL behind a
//! deadpool connection pool; every statement is parameterized, and the
//! claim update path commits its row change and audit rows in a single
//! transaction.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod history_cache;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use auth::{auth_middleware, hash_password, issue_token, validate_token, AuthConfig, Claims};
pub use config::ApiConfig;
pub use db::{DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use history_cache::{Clock, HistoryCache, SystemClock};
pub use routes::create_api_router;
pub use types::{Actor, UpdateClaimRequest};
