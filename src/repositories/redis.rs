use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{KeyValueStore, Lookup, StoreResult};
use crate::db::RedisConnection;

/// Seconds for `SET .. EX`; Redis rejects a zero expiry
fn expiry_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// [`KeyValueStore`] over a shared Redis connection manager.
///
/// Each call clones the manager; clones share one multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub fn new(connection: &RedisConnection) -> Self {
        Self {
            conn: connection.manager(),
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn incr(&self, key: &str) -> StoreResult<u64> {
        let mut conn = self.conn.clone();
        let value: u64 = conn.incr(key, 1u64).await?;
        Ok(value)
    }

    async fn get(&self, key: &str) -> StoreResult<Lookup> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(key).await?;
        Ok(Lookup::classify(raw))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        match ttl {
            Some(ttl) => conn.set_ex::<_, _, ()>(key, value, expiry_seconds(ttl)).await?,
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    /// Writes all entries inside one MULTI/EXEC block
    async fn set_many(
        &self,
        entries: &[(String, String)],
        ttl: Option<Duration>,
    ) -> StoreResult<()> {
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in entries {
            match ttl {
                Some(ttl) => pipe.set_ex(key, value, expiry_seconds(ttl)).ignore(),
                None => pipe.set(key, value).ignore(),
            };
        }

        let mut conn = self.conn.clone();
        pipe.query_async::<()>(&mut conn).await?;
        debug!("Committed {} keys in one transaction", entries.len());
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}
