//! TTL cache for per-claim change-log reads.
//!
//! The legacy tool kept history in a module-level map with a fixed expiry.
//! Here the cache is an explicit component with an injected clock, so expiry
//! and invalidation are testable without waiting on wall time. A successful
//! claim update invalidates that claim's entry.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use claimdesk_core::{ChangeLogEntry, ClaimId};

/// Default entry lifetime.
pub const DEFAULT_HISTORY_TTL: Duration = Duration::from_secs(30);

// ============================================================================
// CLOCK
// ============================================================================

/// Time source for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ============================================================================
// CACHE
// ============================================================================

struct CachedHistory {
    fetched_at: DateTime<Utc>,
    entries: Vec<ChangeLogEntry>,
}

/// History cache keyed by claim id.
pub struct HistoryCache<C: Clock = SystemClock> {
    ttl: Duration,
    clock: C,
    entries: Mutex<HashMap<ClaimId, CachedHistory>>,
}

impl HistoryCache<SystemClock> {
    /// Cache with the wall clock and the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<C: Clock> HistoryCache<C> {
    /// Cache with an injected clock, for tests.
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cached entries for a claim, or `None` when absent or expired.
    /// Expired entries are dropped on read.
    pub fn get(&self, claim_id: ClaimId) -> Option<Vec<ChangeLogEntry>> {
        let mut map = self.entries.lock().ok()?;
        let cached = map.get(&claim_id)?;

        let age = self
            .clock
            .now()
            .signed_duration_since(cached.fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO);

        if age > self.ttl {
            map.remove(&claim_id);
            return None;
        }

        Some(cached.entries.clone())
    }

    /// Store the freshly fetched entries for a claim.
    pub fn put(&self, claim_id: ClaimId, entries: Vec<ChangeLogEntry>) {
        if let Ok(mut map) = self.entries.lock() {
            map.insert(
                claim_id,
                CachedHistory {
                    fetched_at: self.clock.now(),
                    entries,
                },
            );
        }
    }

    /// Drop a claim's cached history. Called after every successful update.
    pub fn invalidate(&self, claim_id: ClaimId) {
        if let Ok(mut map) = self.entries.lock() {
            map.remove(&claim_id);
        }
    }

    /// Number of live (possibly expired) entries, for observability.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    /// Manually advanced clock.
    struct ManualClock {
        now: StdMutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: StdMutex::new(Utc::now()),
            }
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += chrono::Duration::from_std(by).unwrap();
        }
    }

    impl Clock for &ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn entry(claim_id: i64) -> ChangeLogEntry {
        ChangeLogEntry {
            id: 1,
            claim_id,
            user_id: 7,
            username: "mgarcia".to_string(),
            field_name: "charge_amt".to_string(),
            old_value: Some("150.00".to_string()),
            new_value: None,
            changed_at: Utc::now(),
        }
    }

    #[test]
    fn test_hit_within_ttl() {
        let clock = ManualClock::new();
        let cache = HistoryCache::with_clock(Duration::from_secs(30), &clock);

        cache.put(42, vec![entry(42)]);
        clock.advance(Duration::from_secs(29));
        assert_eq!(cache.get(42).map(|e| e.len()), Some(1));
    }

    #[test]
    fn test_expiry_follows_injected_clock() {
        let clock = ManualClock::new();
        let cache = HistoryCache::with_clock(Duration::from_secs(30), &clock);

        cache.put(42, vec![entry(42)]);
        clock.advance(Duration::from_secs(31));
        assert_eq!(cache.get(42), None);
        // Expired entry was dropped, not just hidden.
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let cache = HistoryCache::new(Duration::from_secs(30));
        cache.put(42, vec![entry(42)]);
        cache.invalidate(42);
        assert_eq!(cache.get(42), None);
    }

    #[test]
    fn test_empty_history_is_cacheable() {
        let cache = HistoryCache::new(Duration::from_secs(30));
        cache.put(42, vec![]);
        assert_eq!(cache.get(42), Some(vec![]));
    }
}
