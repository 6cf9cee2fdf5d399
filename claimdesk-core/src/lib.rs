//! Core domain types for the Claimdesk billing-claims system.
//!
//! This crate holds everything shared between the API server and the
//! consumer-side client: the claim record and its canonical field registry,
//! payload normalization (numeric coercion, date canonicalization,
//! legacy-field stripping), field-level diffing, change-log entries, and
//! search/history filters. It performs no I/O.

pub mod claim;
pub mod envelope;
pub mod error;
pub mod fields;
pub mod filter;
pub mod history;
pub mod normalize;
pub mod patch;
pub mod status;
pub mod user;
pub mod value;

pub use claim::Claim;
pub use envelope::Envelope;
pub use error::ValidationError;
pub use fields::{ClaimField, FieldKind, LEGACY_FIELDS};
pub use filter::{HistoryFilters, Page, SearchFilters};
pub use history::ChangeLogEntry;
pub use normalize::{normalize_date, normalize_patch, normalize_value};
pub use patch::{diff_against, ClaimPatch, FieldChange};
pub use status::{color_hint, StatusColor};
pub use user::{UserAccount, UserRole};
pub use value::FieldValue;

/// Timestamp type used across all entities.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Numeric claim identifier.
pub type ClaimId = i64;

/// Numeric user identifier.
pub type UserId = i64;
