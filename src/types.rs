use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::db::StoreHealth;
use crate::errors::AppError;
use crate::repositories::KeyValueStore;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Serialize, Deserialize)]
pub struct ResponsePayload {
    pub status: i32,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub store_health: StoreHealth,
    pub uptime_seconds: u64,
}

// Shared application state handed to every worker
pub struct AppState {
    pub start_time: Instant,
    pub version: String,
    pub store: Arc<dyn KeyValueStore>,
    pub backend: &'static str,
    /// Upper bound for the health probe's PING; `None` waits indefinitely
    pub probe_timeout: Option<Duration>,
}
