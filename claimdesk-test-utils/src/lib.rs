//! Claimdesk Test Utilities
//!
//! Centralized fixtures for the Claimdesk workspace: representative claim
//! rows, change-log entries, and raw update payloads used by both the API
//! and client test suites.

// Re-export core types for convenience
pub use claimdesk_core::{
    Claim, ClaimField, ClaimPatch, ChangeLogEntry, FieldValue, HistoryFilters, Page,
    SearchFilters, UserAccount, UserRole,
};

use chrono::{TimeZone, Utc};

/// A representative stored claim: billed, primary paid, balance outstanding.
pub fn sample_claim() -> Claim {
    Claim {
        id: 42,
        patient_id: Some("P-00117".to_string()),
        patient_first_name: Some("Jane".to_string()),
        patient_last_name: Some("Doe".to_string()),
        dob: Some("1978-06-11".to_string()),
        cpt_code: Some("99213".to_string()),
        cpt_id: Some(99213),
        service_start: Some("2025-02-10".to_string()),
        service_end: Some("2025-02-10".to_string()),
        claim_status: Some(claimdesk_core::status::BILLED.to_string()),
        status_type: None,
        charge_dt: Some("2025-02-12".to_string()),
        charge_amt: Some(150.0),
        allowed_amt: Some(110.0),
        total_amt: Some(150.0),
        write_off: Some(40.0),
        balance: Some(30.0),
        reimb_pct: Some(80.0),
        prim_payer: Some("Acme Health".to_string()),
        prim_amt: Some(80.0),
        prim_post_dt: Some("2025-03-01".to_string()),
        prim_recv_dt: Some("2025-03-04".to_string()),
        prim_chk_det: Some("CHK 5512".to_string()),
        prim_chk_amt: Some(80.0),
        prim_cmt: None,
        prim_denial_code: None,
        sec_payer: None,
        sec_amt: None,
        sec_post_dt: None,
        sec_recv_dt: None,
        sec_chk_det: None,
        sec_chk_amt: None,
        sec_cmt: None,
        sec_denial_code: None,
        pat_amt: None,
        pat_recv_dt: None,
        notes: None,
    }
}

/// A claim with the given id and everything else from [`sample_claim`].
pub fn claim_with_id(id: i64) -> Claim {
    Claim { id, ..sample_claim() }
}

/// A change-log entry for the canonical spec example: charge_amt 150.00 -> NULL.
pub fn sample_entry(claim_id: i64) -> ChangeLogEntry {
    ChangeLogEntry {
        id: 1,
        claim_id,
        user_id: 7,
        username: "mgarcia".to_string(),
        field_name: "charge_amt".to_string(),
        old_value: Some("150.00".to_string()),
        new_value: None,
        changed_at: Utc.with_ymd_and_hms(2025, 3, 4, 15, 30, 0).unwrap(),
    }
}

/// A raw update payload the way a stale UI would send it: numeric strings,
/// locale dates, legacy keys and all.
pub fn legacy_style_payload() -> serde_json::Map<String, serde_json::Value> {
    serde_json::json!({
        "charge_amt": "",
        "prim_post_dt": "3/4/2025",
        "claim_status": "Insurance Paid",
        "visit_id": "V-1001",
        "patient_name": "Doe, Jane",
        "amount": 150,
        "status": "Paid",
    })
    .as_object()
    .cloned()
    .unwrap_or_default()
}
