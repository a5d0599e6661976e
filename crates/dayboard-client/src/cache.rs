//! Keyed query cache with fetch deduplication and stale-result rejection.
//!
//! Each key holds a list snapshot plus a generation counter. A fetch records
//! the generation it started under; by the time it completes, an
//! invalidation (or a newer fetch) may have bumped the counter, in which
//! case the result is discarded instead of overwriting fresher state.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::Mutex;

/// Lifecycle of one cached list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T> {
    /// Never fetched, or invalidated since the last fetch.
    Empty,
    /// A fetch is in flight; further fetches for the key are deduplicated.
    Loading,
    /// Last fetch succeeded.
    Ready(Vec<T>),
    /// Last fetch failed; the next read retries.
    Failed(String),
}

// Manual impl: `T` itself never needs a default.
impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::Empty
    }
}

#[derive(Debug)]
struct Slot<T> {
    state: QueryState<T>,
    generation: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            state: QueryState::Empty,
            generation: 0,
        }
    }
}

/// One cache per entity kind; the key distinguishes query windows.
#[derive(Debug)]
pub struct QueryCache<K, T> {
    slots: Mutex<HashMap<K, Slot<T>>>,
}

impl<K, T> Default for QueryCache<K, T> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone, T: Clone> QueryCache<K, T> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Current state for `key`. An unknown key reads as [`QueryState::Empty`].
    pub fn state(&self, key: &K) -> QueryState<T> {
        self.slots
            .lock()
            .get(key)
            .map(|slot| slot.state.clone())
            .unwrap_or_default()
    }

    /// Claim the right to fetch `key`. Returns the generation token to pass
    /// to [`complete_fetch`](Self::complete_fetch), or `None` when another
    /// fetch for the same key is already in flight.
    pub fn begin_fetch(&self, key: &K) -> Option<u64> {
        let mut slots = self.slots.lock();
        let slot = slots.entry(key.clone()).or_default();
        if matches!(slot.state, QueryState::Loading) {
            return None;
        }
        slot.generation += 1;
        slot.state = QueryState::Loading;
        Some(slot.generation)
    }

    /// Record the outcome of a fetch started with `generation`. Returns
    /// `false` when the result is stale (the key was invalidated or
    /// re-fetched in the meantime) and was discarded.
    pub fn complete_fetch(
        &self,
        key: &K,
        generation: u64,
        result: Result<Vec<T>, String>,
    ) -> bool {
        let mut slots = self.slots.lock();
        let Some(slot) = slots.get_mut(key) else {
            return false;
        };
        if slot.generation != generation {
            tracing::debug!("discarding stale fetch result");
            return false;
        }
        slot.state = match result {
            Ok(items) => QueryState::Ready(items),
            Err(message) => QueryState::Failed(message),
        };
        true
    }

    /// Drop every cached list for this entity kind. In-flight fetches are
    /// superseded: their results will fail the generation check.
    pub fn invalidate_all(&self) {
        let mut slots = self.slots.lock();
        for slot in slots.values_mut() {
            slot.generation += 1;
            slot.state = QueryState::Empty;
        }
    }
}
