use std::time::Duration;

use async_trait::async_trait;

use crate::errors::StoreError;

pub mod keys;
mod memory;
mod redis;

pub use memory::MemoryStore;
pub use self::redis::RedisStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Raw value written by older deployments to mark a reverse index as unusable
const EMPTY_OBJECT: &str = "{}";

/// Outcome of reading a single key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Key does not exist (never written, or evicted after its TTL)
    Absent,
    /// Key exists but holds an empty placeholder
    Sentinel,
    Found(String),
}

impl Lookup {
    /// Classifies a raw backend value. Only backends call this.
    pub fn classify(raw: Option<String>) -> Self {
        match raw {
            None => Lookup::Absent,
            Some(value) if value.is_empty() || value == EMPTY_OBJECT => Lookup::Sentinel,
            Some(value) => Lookup::Found(value),
        }
    }
}

/// Primitive operations every backing keyspace has to provide.
///
/// Implementations must be safe to share across workers without external
/// locking; `incr` in particular has to be atomic in the backend itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Atomically increments the integer at `key` and returns the new value
    ///
    /// ### Errors
    /// * `StoreError::Corrupt` - If the key holds something other than an integer
    /// * `StoreError::Redis` - If the backend cannot be reached
    async fn incr(&self, key: &str) -> StoreResult<u64>;

    /// Reads `key`, treating expired entries as absent
    async fn get(&self, key: &str) -> StoreResult<Lookup>;

    /// Writes `key`; a `ttl` of `None` means the entry never expires
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()>;

    /// Writes every entry with the same TTL.
    ///
    /// The default writes one key at a time, so a failure part-way leaves the
    /// earlier keys in place. Backends with transactions should override it.
    async fn set_many(
        &self,
        entries: &[(String, String)],
        ttl: Option<Duration>,
    ) -> StoreResult<()> {
        for (key, value) in entries {
            self.set(key, value, ttl).await?;
        }
        Ok(())
    }

    /// Round-trips to the backend without touching any key
    async fn ping(&self) -> StoreResult<()>;
}
