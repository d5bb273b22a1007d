use std::time::Duration;

use redis::RedisError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Connection or command errors from Redis
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    /// A stored value exists but cannot be used for the requested operation
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

#[derive(Error, Debug)]
pub enum ShortlinkError {
    /// Identifier has no live record (never created, or evicted by TTL)
    #[error("Unknown short URL: {0}")]
    NotFound(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error("Serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The caller's deadline elapsed while a store call was in flight
    #[error("Deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl ShortlinkError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
