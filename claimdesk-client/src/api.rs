//! High-level API client.
//!
//! `ClaimApi` layers the consumer-side contract over a transport: payloads
//! are normalized defensively before they leave this process, claim updates
//! retry transient failures a bounded number of times with a fixed delay,
//! and reads resolve to the uniform envelope so callers branch on `success`
//! alone.

use serde_json::Value as JsonValue;

use claimdesk_core::{
    normalize_patch, ChangeLogEntry, Claim, ClaimId, ClaimPatch, Envelope, HistoryFilters,
    Page, SearchFilters, UserId,
};

use crate::config::RetryConfig;
use crate::error::ClientError;
use crate::transport::ClaimTransport;

/// The user edits are attributed to.
#[derive(Debug, Clone, PartialEq)]
pub struct ActingUser {
    pub user_id: UserId,
    pub username: String,
}

/// High-level claim API over a transport.
#[derive(Clone)]
pub struct ClaimApi<T> {
    transport: T,
    retry: RetryConfig,
}

impl<T: ClaimTransport> ClaimApi<T> {
    pub fn new(transport: T, retry: RetryConfig) -> Self {
        Self { transport, retry }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ========================================================================
    // READS - no client-side retry beyond what the transport provides
    // ========================================================================

    /// Fetch one claim. Failures fold into the envelope.
    pub async fn get(&self, id: ClaimId) -> Envelope<Claim> {
        match self.transport.get_claim(id).await {
            Ok(envelope) => envelope,
            Err(e) => Envelope::fail(e.to_string()),
        }
    }

    /// Search claims.
    pub async fn list(&self, filters: &SearchFilters) -> Envelope<Vec<Claim>> {
        match self.transport.list_claims(filters).await {
            Ok(envelope) => envelope,
            Err(e) => Envelope::fail(e.to_string()),
        }
    }

    /// Change-log entries for one claim. An empty list is a success.
    pub async fn history(&self, id: ClaimId) -> Envelope<Vec<ChangeLogEntry>> {
        match self.transport.claim_history(id).await {
            Ok(envelope) => envelope,
            Err(e) => Envelope::fail(e.to_string()),
        }
    }

    /// Filtered, paginated global change-log view.
    pub async fn history_all(
        &self,
        filters: &HistoryFilters,
        page: Page,
    ) -> Envelope<Vec<ChangeLogEntry>> {
        match self.transport.history_all(filters, page).await {
            Ok(envelope) => envelope,
            Err(e) => Envelope::fail(e.to_string()),
        }
    }

    // ========================================================================
    // UPDATE - normalized, retried
    // ========================================================================

    /// Normalize a raw field map and apply it as a partial update.
    ///
    /// Normalization happens here too, not just server-side: a stale UI
    /// sending numeric strings or locale dates gets the same coercion the
    /// service applies.
    pub async fn update_raw(
        &self,
        id: ClaimId,
        fields: &serde_json::Map<String, JsonValue>,
        user: &ActingUser,
    ) -> Result<Claim, ClientError> {
        let patch = normalize_patch(fields)?;
        self.update(id, &patch, user).await
    }

    /// Apply a normalized partial update, retrying transient failures.
    ///
    /// Retries up to `retry.max_attempts` total attempts with the fixed
    /// `retry.delay` between them; terminal failures (4xx, validation)
    /// surface immediately. Returns the server's canonical row.
    pub async fn update(
        &self,
        id: ClaimId,
        patch: &ClaimPatch,
        user: &ActingUser,
    ) -> Result<Claim, ClientError> {
        let body = build_update_body(patch, user);

        let mut attempt = 1;
        loop {
            match self.try_put(id, &body).await {
                Ok(claim) => return Ok(claim),
                Err(e) if e.is_transient() && attempt < self.retry.max_attempts => {
                    tracing::warn!(
                        claim_id = id,
                        attempt,
                        error = %e,
                        "transient update failure; retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_put(&self, id: ClaimId, body: &JsonValue) -> Result<Claim, ClientError> {
        let envelope = self.transport.put_claim(id, body).await?;

        if !envelope.success {
            return Err(ClientError::Api {
                status: 200,
                message: envelope
                    .message
                    .unwrap_or_else(|| "update rejected".to_string()),
            });
        }

        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("update returned no claim".to_string()))
    }
}

/// Assemble the wire body: acting-user metadata plus the normalized fields.
fn build_update_body(patch: &ClaimPatch, user: &ActingUser) -> JsonValue {
    let mut body = patch.to_json_map();
    body.insert("user_id".to_string(), JsonValue::from(user.user_id));
    body.insert(
        "username".to_string(),
        JsonValue::String(user.username.clone()),
    );
    JsonValue::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimdesk_core::{ClaimField, FieldValue};

    #[test]
    fn test_update_body_carries_actor_and_fields() {
        let mut patch = ClaimPatch::new();
        patch.set(ClaimField::ChargeAmt, FieldValue::Null);
        patch.set(ClaimField::Notes, FieldValue::Text("called payer".into()));

        let user = ActingUser {
            user_id: 7,
            username: "mgarcia".to_string(),
        };

        let body = build_update_body(&patch, &user);
        assert_eq!(body["user_id"], 7);
        assert_eq!(body["username"], "mgarcia");
        assert!(body["charge_amt"].is_null());
        assert_eq!(body["notes"], "called payer");
    }
}
