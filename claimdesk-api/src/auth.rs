//! Authentication for the Claimdesk API.
//!
//! Credentials live in the `users` table (salted SHA-256 digests); sessions
//! are stateless HS256 bearer tokens. This replaces the hardcoded credential
//! list the legacy tool shipped with - accounts are managed through the user
//! routes, not source code.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use claimdesk_core::{UserAccount, UserRole};

use crate::error::{ApiError, ApiResult};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "claimdesk-dev-secret".to_string(),
            token_ttl_secs: 8 * 60 * 60,
        }
    }
}

impl AuthConfig {
    /// Create auth configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CLAIMDESK_JWT_SECRET`: signing secret (a dev default is used, with
    ///   a warning, when unset)
    /// - `CLAIMDESK_TOKEN_TTL_SECS`: token lifetime (default: 8 hours)
    pub fn from_env() -> Self {
        let jwt_secret = match std::env::var("CLAIMDESK_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!(
                    "CLAIMDESK_JWT_SECRET not set - using the development secret. \
                     Do not run production traffic this way."
                );
                Self::default().jwt_secret
            }
        };

        let token_ttl_secs = std::env::var("CLAIMDESK_TOKEN_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8 * 60 * 60);

        Self {
            jwt_secret,
            token_ttl_secs,
        }
    }
}

// ============================================================================
// PASSWORD HASHING
// ============================================================================

/// Encode a password as `salt:sha256(salt:password)` hex.
pub fn hash_password(password: &str) -> String {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = hex::encode(salt_bytes);
    format!("{}:{}", salt, digest(&salt, password))
}

/// Check a password attempt against a stored `salt:digest` value.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once(':') else {
        return false;
    };
    // Compare every byte; no early exit.
    let actual = digest(salt, password);
    actual.len() == expected.len()
        && actual
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

// ============================================================================
// TOKENS
// ============================================================================

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub username: String,
    pub role: UserRole,
    /// Expiry, seconds since epoch.
    pub exp: i64,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
}

/// Issue a session token for an authenticated account.
pub fn issue_token(user: &UserAccount, config: &AuthConfig) -> ApiResult<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role,
        exp: now + config.token_ttl_secs as i64,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal_error(format!("Failed to sign token: {}", e)))
}

/// Validate a bearer token and return its claims.
pub fn validate_token(token: &str, config: &AuthConfig) -> ApiResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::token_expired(),
        _ => ApiError::invalid_token(format!("Invalid token: {}", e)),
    })
}

// ============================================================================
// MIDDLEWARE
// ============================================================================

/// Shared state for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AuthConfig>,
}

/// Axum middleware enforcing a valid bearer token.
///
/// On success the token's [`Claims`] are inserted as a request extension for
/// downstream handlers.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Expected Bearer token"))?;

    let claims = validate_token(token, &state.config)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user() -> UserAccount {
        UserAccount {
            id: 7,
            username: "mgarcia".to_string(),
            display_name: "M. Garcia".to_string(),
            role: UserRole::Staff,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_round_trip() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(hash_password("hunter2"), hash_password("hunter2"));
    }

    #[test]
    fn test_malformed_stored_hash_rejects() {
        assert!(!verify_password("anything", "no-salt-separator"));
    }

    #[test]
    fn test_token_round_trip() {
        let config = AuthConfig::default();
        let token = issue_token(&test_user(), &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "mgarcia");
        assert_eq!(claims.role, UserRole::Staff);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let config = AuthConfig::default();
        let token = issue_token(&test_user(), &config).unwrap();

        let other = AuthConfig {
            jwt_secret: "different".to_string(),
            ..AuthConfig::default()
        };
        assert!(validate_token(&token, &other).is_err());
    }
}
