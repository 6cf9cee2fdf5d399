//! Consumer-side client for the Claimdesk API.
//!
//! Three layers, outermost first:
//! - [`workspace::ClaimWorkspace`] - the optimistic-update state manager the
//!   UI drives;
//! - [`api::ClaimApi`] - normalization, bounded retry, and the uniform
//!   response envelope;
//! - [`transport::ClaimTransport`] - the per-endpoint seam, implemented over
//!   reqwest by [`transport::HttpTransport`] and by scripted fakes in tests.

pub mod api;
pub mod config;
pub mod error;
pub mod transport;
pub mod workspace;

pub use api::{ActingUser, ClaimApi};
pub use config::{ClientConfig, RetryConfig};
pub use error::ClientError;
pub use transport::{ClaimTransport, HttpTransport};
pub use workspace::{ClaimWorkspace, UpdateOutcome};

/// Build the full client stack over HTTP from configuration.
pub fn connect(config: &ClientConfig, user: ActingUser) -> Result<ClaimWorkspace<HttpTransport>, ClientError> {
    let transport = HttpTransport::new(config)?;
    let api = ClaimApi::new(transport, config.retry);
    Ok(ClaimWorkspace::new(api, user))
}

/// Convenience: a standalone API handle without workspace state.
pub fn connect_api(config: &ClientConfig) -> Result<ClaimApi<HttpTransport>, ClientError> {
    let transport = HttpTransport::new(config)?;
    Ok(ClaimApi::new(transport, config.retry))
}
