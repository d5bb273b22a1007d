use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{KeyValueStore, Lookup, StoreResult};
use crate::errors::StoreError;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: String, now: Instant, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.and_then(|ttl| now.checked_add(ttl)),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// Process-local keyspace backed by a sharded `DashMap`.
///
/// Expired entries are dropped lazily when they are next touched. Each key is
/// updated under its shard lock, which is what makes `incr` atomic here.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
    /// Milliseconds added to the wall clock, so tests can fast-forward TTLs
    skew_ms: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn now(&self) -> Instant {
        Instant::now() + Duration::from_millis(self.skew_ms.load(Ordering::SeqCst))
    }

    /// Moves this store's clock forward without sleeping
    #[cfg(test)]
    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.skew_ms.fetch_add(millis, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn incr(&self, key: &str) -> StoreResult<u64> {
        let now = self.now();
        let mut entry = self
            .entries
            .entry(key.to_owned())
            .or_insert_with(|| Entry::new("0".to_string(), now, None));

        if entry.is_expired(now) {
            *entry = Entry::new("0".to_string(), now, None);
        }

        let current = entry.value.parse::<u64>().map_err(|_| {
            StoreError::Corrupt(format!("value at '{}' is not an unsigned integer", key))
        })?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::Corrupt(format!("counter at '{}' overflowed", key)))?;

        // INCR keeps whatever TTL the key already had
        entry.value = next.to_string();
        Ok(next)
    }

    async fn get(&self, key: &str) -> StoreResult<Lookup> {
        let now = self.now();

        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(now))
            .is_some()
        {
            return Ok(Lookup::Absent);
        }

        let raw = self.entries.get(key).map(|entry| entry.value.clone());
        Ok(Lookup::classify(raw))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()> {
        let entry = Entry::new(value.to_owned(), self.now(), ttl);
        self.entries.insert(key.to_owned(), entry);
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
