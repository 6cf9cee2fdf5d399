//! Optimistic-update protocol tests for the claim workspace.

use std::time::Duration;

use claimdesk_client::{ActingUser, ClaimApi, ClaimWorkspace, RetryConfig, UpdateOutcome};
use claimdesk_test_utils::claim_with_id;

#[path = "support/transport.rs"]
mod support;
use support::ScriptedTransport;

fn workspace(transport: ScriptedTransport) -> ClaimWorkspace<ScriptedTransport> {
    let api = ClaimApi::new(
        transport,
        RetryConfig {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        },
    );
    ClaimWorkspace::new(
        api,
        ActingUser {
            user_id: 7,
            username: "mgarcia".to_string(),
        },
    )
}

fn fields(json: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    json.as_object().cloned().expect("object")
}

#[tokio::test(start_paused = true)]
async fn committed_update_adopts_the_server_row() {
    let transport = ScriptedTransport::new();
    transport.script_get_ok(claim_with_id(42));

    // The server canonicalizes the locale date the optimistic guess kept raw.
    let mut server_row = claim_with_id(42);
    server_row.claim_status = Some("Insurance Paid".to_string());
    server_row.prim_recv_dt = Some("2025-03-04".to_string());
    transport.script_put_ok(server_row.clone());

    let mut ws = workspace(transport);
    ws.load_claim(42).await;

    let outcome = ws
        .submit_update(42, &fields(serde_json::json!({
            "claim_status": "Insurance Paid",
            "prim_recv_dt": "3/4/2025",
        })))
        .await
        .expect("update succeeds");

    assert_eq!(outcome, UpdateOutcome::Committed(server_row.clone()));
    // Server-computed values win over the optimistic guess.
    assert_eq!(ws.current(), Some(&server_row));
}

#[tokio::test(start_paused = true)]
async fn optimistic_merge_is_visible_in_list_rows_after_commit() {
    let transport = ScriptedTransport::new();
    transport.script_list_ok(vec![claim_with_id(41), claim_with_id(42)]);

    let mut server_row = claim_with_id(42);
    server_row.balance = None;
    transport.script_put_ok(server_row.clone());

    let mut ws = workspace(transport);
    ws.search(&claimdesk_core::SearchFilters::default()).await;

    ws.submit_update(42, &fields(serde_json::json!({"balance": ""})))
        .await
        .expect("update succeeds");

    let row = ws.results().iter().find(|c| c.id == 42).expect("row kept");
    assert_eq!(row.balance, None);
    // The other row was untouched.
    let other = ws.results().iter().find(|c| c.id == 41).expect("row kept");
    assert_eq!(other.balance, Some(30.0));
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_roll_back_to_the_refetched_row() {
    let transport = ScriptedTransport::new();
    transport.script_get_ok(claim_with_id(42));

    for _ in 0..3 {
        transport.script_put_failure(503);
    }
    // The rollback re-fetch returns the authoritative row.
    let mut authoritative = claim_with_id(42);
    authoritative.claim_status = Some("Prim Denied".to_string());
    transport.script_get_ok(authoritative.clone());

    let mut ws = workspace(transport.clone());
    ws.load_claim(42).await;

    let outcome = ws
        .submit_update(42, &fields(serde_json::json!({"claim_status": "Insurance Paid"})))
        .await
        .expect("rollback is a handled outcome");

    match outcome {
        UpdateOutcome::RolledBack { claim, message } => {
            assert_eq!(claim, authoritative);
            assert!(!message.is_empty());
        }
        other => panic!("expected rollback, got {:?}", other),
    }

    // Local state equals the re-fetch result, not the optimistic guess.
    assert_eq!(ws.current(), Some(&authoritative));
    assert_eq!(transport.put_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn failed_rollback_refetch_restores_last_known_good() {
    let transport = ScriptedTransport::new();
    let original = claim_with_id(42);
    transport.script_get_ok(original.clone());

    for _ in 0..3 {
        transport.script_put_failure(503);
    }
    transport.script_get_failure(500);

    let mut ws = workspace(transport);
    ws.load_claim(42).await;

    let err = ws
        .submit_update(42, &fields(serde_json::json!({"claim_status": "Insurance Paid"})))
        .await
        .expect_err("double failure surfaces the update error");

    assert!(err.is_transient());
    // The optimistic guess was discarded; pre-update state is back.
    assert_eq!(ws.current(), Some(&original));
}

#[tokio::test(start_paused = true)]
async fn invalid_payload_fails_before_any_state_change() {
    let transport = ScriptedTransport::new();
    transport.script_get_ok(claim_with_id(42));

    let mut ws = workspace(transport.clone());
    ws.load_claim(42).await;
    let before = ws.current().cloned();

    let err = ws
        .submit_update(42, &fields(serde_json::json!({"charge_amt": "a lot"})))
        .await
        .expect_err("non-numeric amount is a form error");

    assert!(matches!(err, claimdesk_client::ClientError::Validation(_)));
    assert_eq!(ws.current().cloned(), before);
    // Nothing was sent.
    assert_eq!(transport.put_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancelled_update_releases_the_in_flight_flag() {
    let transport = ScriptedTransport::new();
    transport.script_get_ok(claim_with_id(42));
    // No scripted put: the update parks in flight forever.

    let mut ws = workspace(transport.clone());
    ws.load_claim(42).await;

    {
        let payload = fields(serde_json::json!({"claim_status": "Billed"}));
        let fut = ws.submit_update(42, &payload);
        tokio::pin!(fut);

        // Drive the update up to its parked network call, then drop it -
        // the unmount case.
        tokio::select! {
            biased;
            _ = &mut fut => panic!("parked update must not complete"),
            _ = tokio::task::yield_now() => {}
        }
    }

    assert!(!ws.is_update_in_flight(42));

    // A fresh update for the same claim is accepted and completes.
    transport.script_put_ok(claim_with_id(42));
    ws.submit_update(42, &fields(serde_json::json!({"claim_status": "Billed"})))
        .await
        .expect("flag was released");
}
