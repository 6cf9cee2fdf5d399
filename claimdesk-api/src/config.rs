//! API Configuration Module
//!
//! CORS and server-level settings, loaded from environment variables with
//! development defaults.

use std::time::Duration;

/// API configuration for CORS and request handling.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    /// Per-request handler timeout.
    pub request_timeout: Duration,

    /// TTL for the per-claim history cache.
    pub history_cache_ttl: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(), // Empty = allow all
            cors_max_age_secs: 86400,
            request_timeout: Duration::from_secs(30),
            history_cache_ttl: crate::history_cache::DEFAULT_HISTORY_TTL,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `CLAIMDESK_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `CLAIMDESK_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `CLAIMDESK_REQUEST_TIMEOUT_SECS`: Handler timeout (default: 30)
    /// - `CLAIMDESK_HISTORY_CACHE_TTL_SECS`: History cache TTL (default: 30)
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CLAIMDESK_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs = std::env::var("CLAIMDESK_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400);

        let request_timeout = Duration::from_secs(
            std::env::var("CLAIMDESK_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        );

        let history_cache_ttl = Duration::from_secs(
            std::env::var("CLAIMDESK_HISTORY_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        );

        Self {
            cors_origins,
            cors_max_age_secs,
            request_timeout,
            history_cache_ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_all_origins() {
        let config = ApiConfig::default();
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.history_cache_ttl, Duration::from_secs(30));
    }
}
