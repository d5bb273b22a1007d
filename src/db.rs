use std::time::{Duration, Instant};

use log::{debug, error, info};
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RedisConfig;
use crate::repositories::KeyValueStore;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Redis connection error: {0}")]
    ConnectionError(#[from] redis::RedisError),

    #[error("Redis did not answer within {0}s")]
    ConnectTimeout(u64),
}

pub type DbResult<T> = Result<T, DatabaseError>;

/// The process-wide Redis connection, opened once and shared by every worker
#[derive(Clone)]
pub struct RedisConnection {
    manager: ConnectionManager,
}

/// Backing store health status
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreHealthStatus {
    Healthy,
    Unhealthy,
}

/// Result of a single liveness round trip to the backing store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreHealth {
    pub status: StoreHealthStatus,
    pub backend: String,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RedisConnection {
    /// Open the connection manager and make sure the server answers
    pub async fn connect(config: &RedisConfig) -> DbResult<Self> {
        info!("Initializing Redis connection");
        debug!(
            "Redis configuration: timeout={}s",
            config.connect_timeout_seconds
        );

        let client = redis::Client::open(config.url.as_str())?;
        let limit = Duration::from_secs(config.connect_timeout_seconds);

        let manager = tokio::time::timeout(limit, ConnectionManager::new(client))
            .await
            .map_err(|_| DatabaseError::ConnectTimeout(config.connect_timeout_seconds))??;

        let mut conn = manager.clone();
        let pong = tokio::time::timeout(limit, redis::cmd("PING").query_async::<String>(&mut conn))
            .await
            .map_err(|_| DatabaseError::ConnectTimeout(config.connect_timeout_seconds))?
            .map_err(|e| {
                error!("Redis did not answer PING: {}", e);
                DatabaseError::ConnectionError(e)
            })?;

        info!("Redis connection established ({})", pong);
        Ok(Self { manager })
    }

    pub fn manager(&self) -> ConnectionManager {
        self.manager.clone()
    }
}

/// Ping the store and report how long it took; a ping still pending after
/// `timeout` reports unhealthy
pub async fn check_health(
    store: &dyn KeyValueStore,
    backend: &str,
    timeout: Option<Duration>,
) -> StoreHealth {
    let started = Instant::now();
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, store.ping()).await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(_) => Err(format!("no PING reply within {}ms", limit.as_millis())),
        },
        None => store.ping().await.map_err(|e| e.to_string()),
    };
    let response_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match outcome {
        Ok(()) => StoreHealth {
            status: StoreHealthStatus::Healthy,
            backend: backend.to_string(),
            response_time_ms,
            message: None,
        },
        Err(e) => {
            error!("Store health check failed: {}", e);
            StoreHealth {
                status: StoreHealthStatus::Unhealthy,
                backend: backend.to_string(),
                response_time_ms,
                message: Some(e),
            }
        }
    }
}
