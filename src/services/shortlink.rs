use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ShortlinkError;
use crate::models::UrlDetail;
use crate::repositories::{keys, KeyValueStore, Lookup};
use crate::utils::hash::url_fingerprint;
use crate::utils::id_generator::generate_identifier;

type Result<T> = std::result::Result<T, ShortlinkError>;

/// Entry points the transport layer calls after validating its input
#[async_trait]
pub trait ShortlinkServiceTrait: Send + Sync {
    /// Returns the live identifier for `url`, minting one if none exists.
    ///
    /// ### Arguments
    /// * `url` - The URL to shorten
    /// * `expiration_in_minutes` - TTL shared by every record; `0` never expires
    ///
    /// ### Errors
    /// * `ShortlinkError::Storage` - If the keyspace cannot be read or written
    /// * `ShortlinkError::DeadlineExceeded` - If the operation deadline elapsed
    async fn shorten(&self, url: &str, expiration_in_minutes: u64) -> Result<String>;

    /// Resolves an identifier back to its original URL
    ///
    /// ### Errors
    /// * `ShortlinkError::NotFound` - If the identifier never existed or has expired
    /// * `ShortlinkError::Storage` - If the keyspace cannot be read
    async fn unshorten(&self, shortlink: &str) -> Result<String>;

    /// Returns the detail record stored alongside an identifier, exactly as
    /// it was written. Records from older writers may carry other field
    /// types or extra fields; none of that is rewritten.
    ///
    /// ### Errors
    /// * `ShortlinkError::NotFound` - If the identifier never existed or has expired
    /// * `ShortlinkError::Storage` - If the keyspace cannot be read
    /// * `ShortlinkError::Serialization` - If the stored record is not JSON
    async fn shortlink_info(&self, shortlink: &str) -> Result<Value>;
}

/// Maps a minutes count onto the store's TTL, where `None` means persistent
fn ttl_from_minutes(minutes: u64) -> Option<Duration> {
    (minutes > 0).then(|| Duration::from_secs(minutes.saturating_mul(60)))
}

/// Allocation and lookup engine for shortlinks.
///
/// Holds no locks of its own. Identifier uniqueness comes from the store's
/// atomic increment, so any number of workers can share one instance.
pub struct ShortlinkStore<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    deadline: Option<Duration>,
}

impl<S: KeyValueStore + ?Sized> ShortlinkStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            deadline: None,
        }
    }

    /// Abort any operation still waiting on the store after `deadline`
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send,
        F: Future<Output = Result<T>> + Send,
    {
        match self.deadline {
            Some(limit) => tokio::time::timeout(limit, operation)
                .await
                .map_err(|_| ShortlinkError::DeadlineExceeded(limit))?,
            None => operation.await,
        }
    }

    async fn mint(&self, url: &str, fingerprint: &str, expiration_in_minutes: u64) -> Result<String> {
        let counter = self.store.incr(keys::COUNTER_KEY).await?;
        let shortlink = generate_identifier(counter);

        let detail = serde_json::to_string(&UrlDetail::new(url, expiration_in_minutes))?;
        let records = [
            (keys::shortlink_key(&shortlink), url.to_string()),
            (keys::url_hash_key(fingerprint), shortlink.clone()),
            (keys::detail_key(&shortlink), detail),
        ];

        // One write so the forward, reverse and detail records live and die together
        self.store
            .set_many(&records, ttl_from_minutes(expiration_in_minutes))
            .await?;

        Ok(shortlink)
    }
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> ShortlinkServiceTrait for ShortlinkStore<S> {
    async fn shorten(&self, url: &str, expiration_in_minutes: u64) -> Result<String> {
        self.bounded(async {
            let fingerprint = url_fingerprint(url);

            // An existing mapping keeps whatever TTL it has left
            match self.store.get(&keys::url_hash_key(&fingerprint)).await? {
                Lookup::Found(shortlink) => Ok(shortlink),
                Lookup::Absent | Lookup::Sentinel => {
                    self.mint(url, &fingerprint, expiration_in_minutes).await
                }
            }
        })
        .await
    }

    async fn unshorten(&self, shortlink: &str) -> Result<String> {
        self.bounded(async {
            match self.store.get(&keys::shortlink_key(shortlink)).await? {
                Lookup::Found(url) => Ok(url),
                Lookup::Absent | Lookup::Sentinel => {
                    Err(ShortlinkError::NotFound(shortlink.to_string()))
                }
            }
        })
        .await
    }

    async fn shortlink_info(&self, shortlink: &str) -> Result<Value> {
        self.bounded(async {
            match self.store.get(&keys::detail_key(shortlink)).await? {
                Lookup::Found(payload) => Ok(serde_json::from_str(&payload)?),
                Lookup::Absent | Lookup::Sentinel => {
                    Err(ShortlinkError::NotFound(shortlink.to_string()))
                }
            }
        })
        .await
    }
}
