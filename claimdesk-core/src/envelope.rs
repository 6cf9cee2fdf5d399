//! The uniform response envelope.
//!
//! Every read and write resolves to `{success, data, message?}` on the wire,
//! so callers never need to distinguish "empty" from "errored" except via the
//! `success` flag. An empty result set is a success carrying an empty list.

use serde::{Deserialize, Serialize};

/// Wire envelope for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Envelope<T> {
    pub success: bool,
    /// Payload; `null` when the request succeeded but found nothing.
    pub data: Option<T>,
    /// Human-readable context, mostly on failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// A successful response carrying data.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// A successful response whose payload may legitimately be absent.
    pub fn ok_or_null(data: Option<T>) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// A failed response with a message for the operator.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_with_empty_list_is_success() -> Result<(), serde_json::Error> {
        let env: Envelope<Vec<i64>> = Envelope::ok(vec![]);
        let json = serde_json::to_value(&env)?;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([]));
        assert!(json.get("message").is_none());
        Ok(())
    }

    #[test]
    fn test_null_data_is_still_serialized() -> Result<(), serde_json::Error> {
        let env: Envelope<i64> = Envelope::ok_or_null(None);
        let json = serde_json::to_value(&env)?;
        assert!(json["data"].is_null());
        Ok(())
    }

    #[test]
    fn test_fail_carries_message() {
        let env: Envelope<i64> = Envelope::fail("claim 42 not found");
        assert!(!env.success);
        assert_eq!(env.message.as_deref(), Some("claim 42 not found"));
    }
}
