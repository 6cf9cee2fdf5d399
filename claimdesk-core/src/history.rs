//! Change-log entries - the per-field audit trail.

use serde::{Deserialize, Serialize};

use crate::{ClaimId, Timestamp, UserId};

/// One field's old-to-new transition on a claim.
///
/// Written only by the claim service as a side effect of a successful update,
/// inside the same transaction as the row change. Immutable once written;
/// never updated or deleted. An update request that changes N fields produces
/// exactly N entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChangeLogEntry {
    pub id: i64,
    pub claim_id: ClaimId,
    pub user_id: UserId,
    pub username: String,
    /// Canonical column name of the mutated field.
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub changed_at: Timestamp,
}
