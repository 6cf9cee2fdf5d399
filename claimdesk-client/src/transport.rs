//! Transport seam for the API client.
//!
//! `ClaimTransport` is the boundary the workspace and retry logic are
//! written against; `HttpTransport` is the reqwest implementation. Tests
//! script a fake transport instead of standing up a server.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use claimdesk_core::{
    ChangeLogEntry, Claim, ClaimId, Envelope, HistoryFilters, Page, SearchFilters,
};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Low-level API operations, one per REST endpoint.
#[async_trait]
pub trait ClaimTransport: Send + Sync {
    async fn get_claim(&self, id: ClaimId) -> Result<Envelope<Claim>, ClientError>;

    async fn list_claims(
        &self,
        filters: &SearchFilters,
    ) -> Result<Envelope<Vec<Claim>>, ClientError>;

    /// Issue the PUT for a partial update. `body` is the normalized payload
    /// including acting-user metadata.
    async fn put_claim(
        &self,
        id: ClaimId,
        body: &JsonValue,
    ) -> Result<Envelope<Claim>, ClientError>;

    async fn claim_history(
        &self,
        id: ClaimId,
    ) -> Result<Envelope<Vec<ChangeLogEntry>>, ClientError>;

    async fn history_all(
        &self,
        filters: &HistoryFilters,
        page: Page,
    ) -> Result<Envelope<Vec<ChangeLogEntry>>, ClientError>;
}

// ============================================================================
// HTTP TRANSPORT
// ============================================================================

/// reqwest-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let timeout = std::time::Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn send_json<T>(&self, request: reqwest::RequestBuilder) -> Result<Envelope<T>, ClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json::<Envelope<T>>().await?)
        } else {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<JsonValue>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl ClaimTransport for HttpTransport {
    async fn get_claim(&self, id: ClaimId) -> Result<Envelope<Claim>, ClientError> {
        let request = self.request(reqwest::Method::GET, &format!("/api/claims/{}", id));
        self.send_json(request).await
    }

    async fn list_claims(
        &self,
        filters: &SearchFilters,
    ) -> Result<Envelope<Vec<Claim>>, ClientError> {
        let request = self
            .request(reqwest::Method::GET, "/api/claims")
            .query(filters);
        self.send_json(request).await
    }

    async fn put_claim(
        &self,
        id: ClaimId,
        body: &JsonValue,
    ) -> Result<Envelope<Claim>, ClientError> {
        // Cache-busting marker: intermediaries must not replay a stale write
        // response.
        let marker = chrono::Utc::now().timestamp_millis();
        let request = self
            .request(reqwest::Method::PUT, &format!("/api/claims/{}", id))
            .query(&[("_ts", marker)])
            .json(body);
        self.send_json(request).await
    }

    async fn claim_history(
        &self,
        id: ClaimId,
    ) -> Result<Envelope<Vec<ChangeLogEntry>>, ClientError> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("/api/claims/{}/history", id),
        );
        self.send_json(request).await
    }

    async fn history_all(
        &self,
        filters: &HistoryFilters,
        page: Page,
    ) -> Result<Envelope<Vec<ChangeLogEntry>>, ClientError> {
        let request = self
            .request(reqwest::Method::GET, "/api/claims/history/all")
            .query(filters)
            .query(&[("page", page.page), ("limit", page.limit)]);
        self.send_json(request).await
    }
}
