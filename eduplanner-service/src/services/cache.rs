//! In-memory response cache with a fixed time-to-live.

use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Concurrent key/value cache whose entries expire `ttl` after insertion.
///
/// A zero TTL disables expiry. When `max_entries` is set, inserting a new key
/// into a full cache first purges stale entries and then, if still full,
/// evicts the oldest one.
#[derive(Clone)]
pub struct TtlCache<K, V> {
    entries: Arc<DashMap<K, (V, Instant)>>,
    ttl: Duration,
    max_entries: Option<usize>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
            max_entries: None,
        }
    }

    /// Cap the number of stored entries. Zero leaves the cache unbounded.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = (max_entries > 0).then_some(max_entries);
        self
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_expired(&self, inserted_at: Instant) -> bool {
        !self.ttl.is_zero() && inserted_at.elapsed() >= self.ttl
    }

    /// Fetch a live entry. Stale entries are evicted on the way out.
    pub fn get(&self, key: &K) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) => {
                let (value, inserted_at) = entry.value();
                if !self.is_expired(*inserted_at) {
                    return Some(value.clone());
                }
                true
            }
            None => false,
        };

        // The read guard is released before removing to avoid deadlocking the shard.
        if expired {
            self.entries
                .remove_if(key, |_, (_, inserted_at)| self.is_expired(*inserted_at));
        }
        None
    }

    pub fn insert(&self, key: K, value: V) {
        if let Some(max) = self.max_entries {
            if !self.entries.contains_key(&key) && self.entries.len() >= max {
                self.make_room(max);
            }
        }
        self.entries.insert(key, (value, Instant::now()));
    }

    fn make_room(&self, max: usize) {
        self.purge_expired();

        while self.entries.len() >= max {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().1)
                .map(|entry| entry.key().clone());

            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, (_, inserted_at)| !self.is_expired(*inserted_at));
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, including ones that have expired but not yet been purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
