//! Pure tests for the normalize → diff pipeline the update route runs.
//!
//! These exercise the same code path as the DB-backed suite without needing
//! PostgreSQL, so the core update properties hold in a default test run.

use claimdesk_core::{diff_against, normalize_patch, Claim, ClaimField, FieldValue};
use claimdesk_test_utils::{legacy_style_payload, sample_claim};
use proptest::prelude::*;
use serde_json::json;

fn patch_from(json: serde_json::Value) -> claimdesk_core::ClaimPatch {
    normalize_patch(json.as_object().expect("object payload")).expect("valid patch")
}

#[test]
fn changing_k_fields_yields_k_changes_with_correct_pairs() {
    let stored = sample_claim();

    // charge_amt changes to null, claim_status changes, prim_payer is
    // submitted unchanged.
    let patch = patch_from(json!({
        "charge_amt": "",
        "claim_status": "Insurance Paid",
        "prim_payer": "Acme Health",
    }));

    let changes = diff_against(&patch, &stored);
    assert_eq!(changes.len(), 2);

    let amt = changes
        .iter()
        .find(|c| c.field == ClaimField::ChargeAmt)
        .expect("charge_amt changed");
    assert_eq!(amt.old_text(), Some("150.00".to_string()));
    assert_eq!(amt.new_text(), None);

    let status = changes
        .iter()
        .find(|c| c.field == ClaimField::ClaimStatus)
        .expect("claim_status changed");
    assert_eq!(status.old_text(), Some("Billed".to_string()));
    assert_eq!(status.new_text(), Some("Insurance Paid".to_string()));
}

#[test]
fn identical_payload_yields_zero_changes() {
    let stored = sample_claim();

    // Same values the row already holds, sent the sloppy way a UI would.
    let patch = patch_from(json!({
        "charge_amt": "150.00",
        "claim_status": "Billed",
        "service_end": "2/10/2025",
        "cpt_id": 99213,
    }));

    assert!(diff_against(&patch, &stored).is_empty());
}

#[test]
fn legacy_keys_never_reach_the_diff() {
    let stored = sample_claim();
    let patch = normalize_patch(&legacy_style_payload()).expect("valid patch");

    // Only charge_amt, prim_post_dt, and claim_status survive stripping.
    assert_eq!(patch.len(), 3);
    for change in diff_against(&patch, &stored) {
        assert!(ClaimField::parse(change.field.as_str()).is_some());
    }
}

#[test]
fn applying_the_diff_converges_on_the_patch() {
    let mut claim = sample_claim();
    let patch = patch_from(json!({
        "balance": "",
        "prim_recv_dt": "3/4/2025",
        "notes": "resubmitted",
    }));

    claim.apply_patch(&patch);
    assert_eq!(claim.balance, None);
    assert_eq!(claim.prim_recv_dt.as_deref(), Some("2025-03-04"));

    // A second diff against the updated row is empty: the update is
    // idempotent.
    assert!(diff_against(&patch, &claim).is_empty());
}

proptest! {
    /// For any subset of text fields set to fresh values, the diff reports
    /// exactly that subset, and re-applying converges.
    #[test]
    fn prop_diff_matches_touched_fields(mask in proptest::collection::vec(any::<bool>(), 5)) {
        let text_fields = [
            ClaimField::Notes,
            ClaimField::PrimCmt,
            ClaimField::SecPayer,
            ClaimField::StatusType,
            ClaimField::PrimDenialCode,
        ];

        let stored = sample_claim();
        let mut patch = claimdesk_core::ClaimPatch::new();
        let mut expected = 0usize;
        for (field, touch) in text_fields.iter().zip(&mask) {
            if *touch {
                patch.set(*field, FieldValue::Text(format!("new {}", field)));
                expected += 1;
            }
        }

        let changes = diff_against(&patch, &stored);
        prop_assert_eq!(changes.len(), expected);

        let mut updated: Claim = stored;
        updated.apply_patch(&patch);
        prop_assert!(diff_against(&patch, &updated).is_empty());
    }
}
