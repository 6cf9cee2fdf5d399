//! Client-side error types.

use claimdesk_core::ValidationError;

/// Errors surfaced by the Claimdesk API client and workspace.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a failure envelope or error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// Rejected before sending: the payload failed local normalization.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An update for this claim id is already awaiting its response.
    #[error("An update for claim {0} is already in flight")]
    UpdateInFlight(i64),
}

impl ClientError {
    /// Whether retrying the request can plausibly succeed.
    ///
    /// Timeouts, connection failures, and 5xx responses are transient;
    /// everything else (4xx, validation, serialization) is terminal.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_transient() {
        let err = ClientError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn test_client_errors_are_terminal() {
        let err = ClientError::Api {
            status: 404,
            message: "not found".to_string(),
        };
        assert!(!err.is_transient());

        let err: ClientError = ValidationError::missing("username").into();
        assert!(!err.is_transient());
    }
}
