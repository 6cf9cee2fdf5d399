//! Request and response types for the Claimdesk REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use claimdesk_core::{UserAccount, UserId, UserRole};

use crate::error::{ApiError, ApiResult};

// ============================================================================
// ACTING USER
// ============================================================================

/// The user a claim update is attributed to in change-log rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub user_id: UserId,
    pub username: String,
}

// ============================================================================
// CLAIM REQUESTS
// ============================================================================

/// Body of `PUT /api/claims/:id`: acting-user metadata plus a partial claim.
///
/// Every key that is not `user_id`/`username` is treated as a candidate claim
/// field and run through normalization; unknown and legacy keys are stripped
/// there, so stale client payloads cannot corrupt canonical columns.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateClaimRequest {
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub fields: serde_json::Map<String, JsonValue>,
}

impl UpdateClaimRequest {
    /// Validate the acting-user identity fields and extract the actor.
    pub fn actor(&self) -> ApiResult<Actor> {
        let user_id = self.user_id.ok_or_else(|| ApiError::missing_field("user_id"))?;
        let username = self
            .username
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::missing_field("username"))?;

        Ok(Actor {
            user_id,
            username: username.to_string(),
        })
    }
}

/// Query parameters for `GET /api/claims`.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct ClaimsQuery {
    pub patient_id: Option<String>,
    pub cpt_id: Option<i64>,
    pub service_end: Option<String>,
}

impl ClaimsQuery {
    pub fn into_filters(self) -> claimdesk_core::SearchFilters {
        claimdesk_core::SearchFilters {
            patient_id: self.patient_id.filter(|s| !s.trim().is_empty()),
            cpt_id: self.cpt_id,
            service_end: self.service_end.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Query parameters for `GET /api/claims/history/all`.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct HistoryAllQuery {
    pub user_id: Option<UserId>,
    pub cpt_id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl HistoryAllQuery {
    pub fn into_parts(self) -> (claimdesk_core::HistoryFilters, claimdesk_core::Page) {
        let filters = claimdesk_core::HistoryFilters {
            user_id: self.user_id,
            cpt_id: self.cpt_id,
            start_date: self.start_date.filter(|s| !s.trim().is_empty()),
            end_date: self.end_date.filter(|s| !s.trim().is_empty()),
        };
        (filters, claimdesk_core::Page::from_params(self.page, self.limit))
    }
}

// ============================================================================
// AUTH / USER REQUESTS
// ============================================================================

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login payload: a bearer token plus the account it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginResponse {
    pub token: String,
    pub user: UserAccount,
}

/// Body of `POST /api/users`.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateUserRequest {
    pub username: String,
    pub display_name: String,
    pub role: UserRole,
    pub password: String,
}

/// Body of `PUT /api/users/:id`. All fields optional; at least one required.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateUserRequest {
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn has_any_updates(&self) -> bool {
        self.display_name.is_some() || self.role.is_some() || self.password.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_update_request_flattens_claim_fields() -> Result<(), serde_json::Error> {
        let req: UpdateClaimRequest = serde_json::from_str(
            r#"{"user_id": 7, "username": "mgarcia", "charge_amt": "", "notes": "called payer"}"#,
        )?;
        let actor = req.actor().unwrap();
        assert_eq!(actor.user_id, 7);
        assert_eq!(actor.username, "mgarcia");
        assert!(req.fields.contains_key("charge_amt"));
        assert!(req.fields.contains_key("notes"));
        assert!(!req.fields.contains_key("user_id"));
        Ok(())
    }

    #[test]
    fn test_update_request_requires_identity_fields() -> Result<(), serde_json::Error> {
        let req: UpdateClaimRequest =
            serde_json::from_str(r#"{"charge_amt": 10, "username": "mgarcia"}"#)?;
        let err = req.actor().unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingField);

        let req: UpdateClaimRequest =
            serde_json::from_str(r#"{"user_id": 7, "username": "   "}"#)?;
        let err = req.actor().unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingField);
        Ok(())
    }

    #[test]
    fn test_claims_query_drops_blank_filters() {
        let query = ClaimsQuery {
            patient_id: Some("  ".to_string()),
            cpt_id: Some(99213),
            service_end: None,
        };
        let filters = query.into_filters();
        assert_eq!(filters.patient_id, None);
        assert_eq!(filters.cpt_id, Some(99213));
    }

    #[test]
    fn test_update_user_request_has_any_updates() {
        assert!(!UpdateUserRequest::default().has_any_updates());
        let req = UpdateUserRequest {
            role: Some(UserRole::Admin),
            ..UpdateUserRequest::default()
        };
        assert!(req.has_any_updates());
    }
}
