//! Canonical field registry for claim records.
//!
//! Every mutable column of the claims table has a variant here. The registry
//! is the single source of truth for which payload keys are accepted, what
//! kind of value each column holds, and how values are rendered into the
//! change log.

use serde::{Deserialize, Serialize};

/// Value kind of a canonical claim column.
///
/// The kind drives normalization (what an empty string means, which parse is
/// attempted) and the text representation written into change-log rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text. Empty string means unset (NULL).
    Text,
    /// Monetary amount. Number-or-null on the wire; logged with two decimals.
    Amount,
    /// Plain numeric value (identifiers, percentages). Number-or-null.
    Number,
    /// Calendar date. Canonical form is `YYYY-MM-DD`; stored as text.
    Date,
}

/// Canonical mutable claim columns.
///
/// The claim id is deliberately absent: identity is immutable and addressed
/// via the URL path, never via the update payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ClaimField {
    PatientId,
    PatientFirstName,
    PatientLastName,
    Dob,
    CptCode,
    CptId,
    ServiceStart,
    ServiceEnd,
    ClaimStatus,
    StatusType,
    ChargeDt,
    ChargeAmt,
    AllowedAmt,
    TotalAmt,
    WriteOff,
    Balance,
    ReimbPct,
    PrimPayer,
    PrimAmt,
    PrimPostDt,
    PrimRecvDt,
    PrimChkDet,
    PrimChkAmt,
    PrimCmt,
    PrimDenialCode,
    SecPayer,
    SecAmt,
    SecPostDt,
    SecRecvDt,
    SecChkDet,
    SecChkAmt,
    SecCmt,
    SecDenialCode,
    PatAmt,
    PatRecvDt,
    Notes,
}

/// Legacy payload keys still emitted by stale clients.
///
/// These are derived values, never authoritative; inbound payloads carrying
/// them have the keys stripped before the update reaches storage.
pub const LEGACY_FIELDS: &[&str] = &["visit_id", "patient_name", "amount", "status"];

impl ClaimField {
    /// All canonical fields, in column order.
    pub const ALL: &'static [ClaimField] = &[
        ClaimField::PatientId,
        ClaimField::PatientFirstName,
        ClaimField::PatientLastName,
        ClaimField::Dob,
        ClaimField::CptCode,
        ClaimField::CptId,
        ClaimField::ServiceStart,
        ClaimField::ServiceEnd,
        ClaimField::ClaimStatus,
        ClaimField::StatusType,
        ClaimField::ChargeDt,
        ClaimField::ChargeAmt,
        ClaimField::AllowedAmt,
        ClaimField::TotalAmt,
        ClaimField::WriteOff,
        ClaimField::Balance,
        ClaimField::ReimbPct,
        ClaimField::PrimPayer,
        ClaimField::PrimAmt,
        ClaimField::PrimPostDt,
        ClaimField::PrimRecvDt,
        ClaimField::PrimChkDet,
        ClaimField::PrimChkAmt,
        ClaimField::PrimCmt,
        ClaimField::PrimDenialCode,
        ClaimField::SecPayer,
        ClaimField::SecAmt,
        ClaimField::SecPostDt,
        ClaimField::SecRecvDt,
        ClaimField::SecChkDet,
        ClaimField::SecChkAmt,
        ClaimField::SecCmt,
        ClaimField::SecDenialCode,
        ClaimField::PatAmt,
        ClaimField::PatRecvDt,
        ClaimField::Notes,
    ];

    /// The column name, as used in SQL, JSON payloads, and change-log rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimField::PatientId => "patient_id",
            ClaimField::PatientFirstName => "patient_first_name",
            ClaimField::PatientLastName => "patient_last_name",
            ClaimField::Dob => "dob",
            ClaimField::CptCode => "cpt_code",
            ClaimField::CptId => "cpt_id",
            ClaimField::ServiceStart => "service_start",
            ClaimField::ServiceEnd => "service_end",
            ClaimField::ClaimStatus => "claim_status",
            ClaimField::StatusType => "status_type",
            ClaimField::ChargeDt => "charge_dt",
            ClaimField::ChargeAmt => "charge_amt",
            ClaimField::AllowedAmt => "allowed_amt",
            ClaimField::TotalAmt => "total_amt",
            ClaimField::WriteOff => "write_off",
            ClaimField::Balance => "balance",
            ClaimField::ReimbPct => "reimb_pct",
            ClaimField::PrimPayer => "prim_payer",
            ClaimField::PrimAmt => "prim_amt",
            ClaimField::PrimPostDt => "prim_post_dt",
            ClaimField::PrimRecvDt => "prim_recv_dt",
            ClaimField::PrimChkDet => "prim_chk_det",
            ClaimField::PrimChkAmt => "prim_chk_amt",
            ClaimField::PrimCmt => "prim_cmt",
            ClaimField::PrimDenialCode => "prim_denial_code",
            ClaimField::SecPayer => "sec_payer",
            ClaimField::SecAmt => "sec_amt",
            ClaimField::SecPostDt => "sec_post_dt",
            ClaimField::SecRecvDt => "sec_recv_dt",
            ClaimField::SecChkDet => "sec_chk_det",
            ClaimField::SecChkAmt => "sec_chk_amt",
            ClaimField::SecCmt => "sec_cmt",
            ClaimField::SecDenialCode => "sec_denial_code",
            ClaimField::PatAmt => "pat_amt",
            ClaimField::PatRecvDt => "pat_recv_dt",
            ClaimField::Notes => "notes",
        }
    }

    /// The value kind this column holds.
    pub fn kind(&self) -> FieldKind {
        match self {
            ClaimField::PatientId
            | ClaimField::PatientFirstName
            | ClaimField::PatientLastName
            | ClaimField::CptCode
            | ClaimField::ClaimStatus
            | ClaimField::StatusType
            | ClaimField::PrimPayer
            | ClaimField::PrimChkDet
            | ClaimField::PrimCmt
            | ClaimField::PrimDenialCode
            | ClaimField::SecPayer
            | ClaimField::SecChkDet
            | ClaimField::SecCmt
            | ClaimField::SecDenialCode
            | ClaimField::Notes => FieldKind::Text,

            ClaimField::ChargeAmt
            | ClaimField::AllowedAmt
            | ClaimField::TotalAmt
            | ClaimField::WriteOff
            | ClaimField::Balance
            | ClaimField::PrimAmt
            | ClaimField::PrimChkAmt
            | ClaimField::SecAmt
            | ClaimField::SecChkAmt
            | ClaimField::PatAmt => FieldKind::Amount,

            ClaimField::CptId | ClaimField::ReimbPct => FieldKind::Number,

            ClaimField::Dob
            | ClaimField::ServiceStart
            | ClaimField::ServiceEnd
            | ClaimField::ChargeDt
            | ClaimField::PrimPostDt
            | ClaimField::PrimRecvDt
            | ClaimField::SecPostDt
            | ClaimField::SecRecvDt
            | ClaimField::PatRecvDt => FieldKind::Date,
        }
    }

    /// Look up a canonical field by its column name.
    ///
    /// Returns `None` for legacy, derived, and unknown keys; callers strip
    /// those from inbound payloads.
    pub fn parse(name: &str) -> Option<ClaimField> {
        ClaimField::ALL.iter().copied().find(|f| f.as_str() == name)
    }
}

impl std::fmt::Display for ClaimField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_field() {
        for field in ClaimField::ALL {
            assert_eq!(ClaimField::parse(field.as_str()), Some(*field));
        }
    }

    #[test]
    fn test_legacy_fields_are_not_canonical() {
        for name in LEGACY_FIELDS {
            assert_eq!(ClaimField::parse(name), None);
        }
    }

    #[test]
    fn test_wire_numeric_fields_are_amount_or_number() {
        // The canonical numeric wire set from the external interface contract.
        let numeric = [
            "charge_amt", "allowed_amt", "total_amt", "write_off", "balance",
            "reimb_pct", "prim_amt", "prim_chk_amt", "sec_amt", "sec_chk_amt",
            "pat_amt",
        ];
        for name in numeric {
            let field = ClaimField::parse(name).unwrap();
            assert!(
                matches!(field.kind(), FieldKind::Amount | FieldKind::Number),
                "{} should be numeric",
                name
            );
        }
    }

    #[test]
    fn test_wire_date_fields_are_date_kind() {
        let dates = [
            "charge_dt", "prim_post_dt", "prim_recv_dt", "sec_post_dt",
            "sec_recv_dt", "pat_recv_dt",
        ];
        for name in dates {
            assert_eq!(ClaimField::parse(name).unwrap().kind(), FieldKind::Date);
        }
    }
}
