//! Shared DB-backed test infrastructure.
//!
//! These helpers assume a PostgreSQL instance with the schema from
//! `migrations/schema.sql` applied, reachable via the `CLAIMDESK_DB_*`
//! environment variables. Tests that use them are gated behind the
//! `db-tests` feature.

use claimdesk_api::{DbClient, DbConfig};

/// Create a test database client from the environment.
pub fn test_db_client() -> DbClient {
    DbClient::from_config(&DbConfig::from_env())
        .expect("failed to create test database pool; is CLAIMDESK_DB_* set?")
}

/// A claim id unique to this test run.
pub fn unique_claim_id() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();

    // Keep it positive and clear of seeded fixture ids.
    (nanos % (i64::MAX as u128 / 2)) as i64 + 1_000_000
}
