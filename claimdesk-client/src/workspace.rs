//! Optimistic-update state manager.
//!
//! `ClaimWorkspace` holds the locally displayed claim and search results and
//! runs the per-update protocol: merge the edit locally first, call the API,
//! then reconcile. On success the server's canonical row wins (its
//! normalized values may differ from the optimistic guess); on failure the
//! claim is re-fetched and local state rolls back to the authoritative row,
//! falling back to the pre-update snapshot when even the re-fetch fails.
//! Displayed state never silently diverges from stored state for more than
//! one failed round-trip.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde_json::Value as JsonValue;

use claimdesk_core::{normalize_patch, Claim, ClaimId, Envelope, SearchFilters};

use crate::api::{ActingUser, ClaimApi};
use crate::error::ClientError;
use crate::transport::ClaimTransport;

/// Terminal state of one update round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// Server confirmed; local state holds the authoritative row.
    Committed(Claim),
    /// Update failed after retries; local state was rolled back to the
    /// re-fetched row and the failure message is surfaced.
    RolledBack { claim: Claim, message: String },
}

/// Holds the claim being edited and any list views containing it.
pub struct ClaimWorkspace<T> {
    api: ClaimApi<T>,
    user: ActingUser,
    current: Option<Claim>,
    results: Vec<Claim>,
    in_flight: Arc<Mutex<HashSet<ClaimId>>>,
}

impl<T: ClaimTransport> ClaimWorkspace<T> {
    pub fn new(api: ClaimApi<T>, user: ActingUser) -> Self {
        Self {
            api,
            user,
            current: None,
            results: Vec::new(),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// The claim currently open for editing.
    pub fn current(&self) -> Option<&Claim> {
        self.current.as_ref()
    }

    /// The last search result set.
    pub fn results(&self) -> &[Claim] {
        &self.results
    }

    /// Whether an update for this claim id is awaiting its response.
    pub fn is_update_in_flight(&self, id: ClaimId) -> bool {
        lock_recovering(&self.in_flight).contains(&id)
    }

    /// Clear held state when the editing surface goes away. Any still-pending
    /// update future that gets dropped releases its in-flight flag on drop and
    /// never touches this discarded state.
    pub fn detach(&mut self) {
        self.current = None;
        self.results.clear();
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// Fetch a claim and make it current.
    pub async fn load_claim(&mut self, id: ClaimId) -> Envelope<Claim> {
        let envelope = self.api.get(id).await;
        if envelope.success {
            self.current = envelope.data.clone();
        }
        envelope
    }

    /// Run a search and hold its results.
    pub async fn search(&mut self, filters: &SearchFilters) -> Envelope<Vec<Claim>> {
        let envelope = self.api.list(filters).await;
        if envelope.success {
            self.results = envelope.data.clone().unwrap_or_default();
        }
        envelope
    }

    // ========================================================================
    // OPTIMISTIC UPDATE PROTOCOL
    // ========================================================================

    /// Apply a raw edit: optimistic local merge, API call, reconcile.
    ///
    /// Errors out before touching any state when the payload fails local
    /// normalization or an update for this claim is already pending. When
    /// both the update and the rollback re-fetch fail, local state is
    /// restored to its pre-update value and the original error surfaces.
    pub async fn submit_update(
        &mut self,
        id: ClaimId,
        fields: &serde_json::Map<String, JsonValue>,
    ) -> Result<UpdateOutcome, ClientError> {
        let patch = normalize_patch(fields)?;

        let _guard = InFlightGuard::acquire(self.in_flight.clone(), id)?;

        // Snapshot, then merge the edit locally before the round-trip.
        let snapshot_current = self.current.clone();
        let snapshot_row = self.results.iter().find(|c| c.id == id).cloned();

        if let Some(current) = self.current.as_mut().filter(|c| c.id == id) {
            current.apply_patch(&patch);
        }
        for row in self.results.iter_mut().filter(|c| c.id == id) {
            row.apply_patch(&patch);
        }

        match self.api.update(id, &patch, &self.user).await {
            Ok(server_row) => {
                // Server-computed values win over the optimistic guess.
                self.adopt(server_row.clone());
                Ok(UpdateOutcome::Committed(server_row))
            }
            Err(update_err) => {
                tracing::warn!(claim_id = id, error = %update_err, "update failed; rolling back");

                let refetch = self.api.get(id).await;
                match (refetch.success, refetch.data) {
                    (true, Some(authoritative)) => {
                        self.adopt(authoritative.clone());
                        Ok(UpdateOutcome::RolledBack {
                            claim: authoritative,
                            message: update_err.to_string(),
                        })
                    }
                    _ => {
                        // Re-fetch failed too: keep last-known-good.
                        self.restore(snapshot_current, id, snapshot_row);
                        Err(update_err)
                    }
                }
            }
        }
    }

    /// Replace every local copy of this claim with the given row.
    fn adopt(&mut self, row: Claim) {
        for existing in self.results.iter_mut().filter(|c| c.id == row.id) {
            *existing = row.clone();
        }
        if self.current.as_ref().is_some_and(|c| c.id == row.id) {
            self.current = Some(row);
        }
    }

    /// Put the pre-update snapshot back.
    fn restore(&mut self, current: Option<Claim>, id: ClaimId, row: Option<Claim>) {
        self.current = current;
        if let Some(row) = row {
            for existing in self.results.iter_mut().filter(|c| c.id == id) {
                *existing = row.clone();
            }
        }
    }
}

// ============================================================================
// IN-FLIGHT TRACKING
// ============================================================================

/// Marks a claim id as having an update in flight; clears it on drop, so a
/// cancelled update future releases the flag without reconciling anything.
#[derive(Debug)]
struct InFlightGuard {
    set: Arc<Mutex<HashSet<ClaimId>>>,
    id: ClaimId,
}

impl InFlightGuard {
    fn acquire(set: Arc<Mutex<HashSet<ClaimId>>>, id: ClaimId) -> Result<Self, ClientError> {
        {
            let mut ids = lock_recovering(&set);
            if !ids.insert(id) {
                return Err(ClientError::UpdateInFlight(id));
            }
        }
        Ok(Self { set, id })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock_recovering(&self.set).remove(&self.id);
    }
}

fn lock_recovering(set: &Mutex<HashSet<ClaimId>>) -> std::sync::MutexGuard<'_, HashSet<ClaimId>> {
    match set.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_for_same_claim_is_refused() {
        let set = Arc::new(Mutex::new(HashSet::new()));

        let first = InFlightGuard::acquire(set.clone(), 42).expect("first acquire");
        let err = InFlightGuard::acquire(set.clone(), 42).expect_err("second must fail");
        assert!(matches!(err, ClientError::UpdateInFlight(42)));

        // A different claim id is unaffected.
        let _other = InFlightGuard::acquire(set.clone(), 43).expect("other claim");

        drop(first);
        let _again = InFlightGuard::acquire(set, 42).expect("released on drop");
    }
}
