//! Client configuration.

use std::time::Duration;

/// Bounded fixed-delay retry policy for transient write failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts, first try included.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

/// Configuration for the Claimdesk API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API server, e.g. `http://localhost:3000`.
    pub api_base_url: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Bearer token attached to every request, when present.
    pub auth_token: Option<String>,
    /// Retry policy for claim updates.
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            request_timeout_ms: 10_000,
            auth_token: None,
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CLAIMDESK_API_URL`: base URL (default: http://localhost:3000)
    /// - `CLAIMDESK_REQUEST_TIMEOUT_MS`: request timeout (default: 10000)
    /// - `CLAIMDESK_API_TOKEN`: bearer token
    /// - `CLAIMDESK_RETRY_ATTEMPTS`: total update attempts (default: 3)
    /// - `CLAIMDESK_RETRY_DELAY_MS`: delay between attempts (default: 500)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_base_url: std::env::var("CLAIMDESK_API_URL")
                .unwrap_or(defaults.api_base_url),
            request_timeout_ms: std::env::var("CLAIMDESK_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
            auth_token: std::env::var("CLAIMDESK_API_TOKEN").ok().filter(|s| !s.is_empty()),
            retry: RetryConfig {
                max_attempts: std::env::var("CLAIMDESK_RETRY_ATTEMPTS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.retry.max_attempts)
                    .max(1),
                delay: Duration::from_millis(
                    std::env::var("CLAIMDESK_RETRY_DELAY_MS")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(500),
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_budget() {
        let config = ClientConfig::default();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay, Duration::from_millis(500));
    }
}
