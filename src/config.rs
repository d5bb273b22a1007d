use std::{env, net::IpAddr, str::FromStr, time::Duration};

use dotenvy::dotenv;
use log::{debug, info, warn};
use serde::Deserialize;
use url::Url;

use crate::errors::ConfigError;

// Server-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub workers: usize,
}

// Application-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub environment: Environment,
    pub log_level: String,
}

// Environment enum for different deployment environments
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!(
                "Invalid environment: {}. Must be one of: development, testing, production",
                s
            )),
        }
    }
}

type ConfigResult<T> = Result<T, ConfigError>;

/// Connection settings for the Redis keyspace holding every shortlink record
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub connect_timeout_seconds: u64,
}

/// Which keyspace backs the shortlink records
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    /// Process-local and lost on restart; for local development only
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            _ => Err(format!(
                "Invalid store backend: {}. Must be one of: redis, memory",
                s
            )),
        }
    }
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Redis => "redis",
            StoreBackend::Memory => "memory",
        }
    }
}

/// Tuning for the shortlink engine itself
#[derive(Debug, Clone, Deserialize)]
pub struct ShortlinkConfig {
    pub backend: StoreBackend,
    /// Upper bound for a single shorten/unshorten/info call; 0 disables it
    pub operation_timeout_ms: u64,
}

impl ShortlinkConfig {
    pub fn operation_timeout(&self) -> Option<Duration> {
        (self.operation_timeout_ms > 0).then(|| Duration::from_millis(self.operation_timeout_ms))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub redis: RedisConfig,
    pub shortlink: ShortlinkConfig,
}

impl Config {
    // Load configuration from environment variables
    pub fn load() -> ConfigResult<Self> {
        match dotenv() {
            Ok(_) => debug!(".env file loaded successfully"),
            Err(e) => warn!("Could not load .env file: {}", e),
        }

        let server = ServerConfig {
            host: get_env_or_default("SERVER_HOST", "127.0.0.1")?,
            port: get_env_or_default("SERVER_PORT", "8000")?,
            workers: get_env_or_default("SERVER_WORKERS", "4")?,
        };

        let version = option_env!("CARGO_PKG_VERSION")
            .unwrap_or("0.1.0")
            .to_string();

        let app = AppConfig {
            name: get_env_or_default("APP_NAME", "shortlink")?,
            version: env::var("APP_VERSION").unwrap_or(version),
            environment: get_env_or_default("APP_ENVIRONMENT", "development")?,
            log_level: get_env_or_default("RUST_LOG", "info")?,
        };

        let redis = RedisConfig {
            url: get_env_or_default("REDIS_URL", "redis://127.0.0.1:6379/0")?,
            connect_timeout_seconds: get_env_or_default("REDIS_CONNECT_TIMEOUT_SECONDS", "5")?,
        };
        validate_redis_url(&redis.url)?;

        let shortlink = ShortlinkConfig {
            backend: get_env_or_default("STORE_BACKEND", "redis")?,
            operation_timeout_ms: get_env_or_default("SHORTLINK_OPERATION_TIMEOUT_MS", "3000")?,
        };

        let config = Config {
            server,
            app,
            redis,
            shortlink,
        };
        info!("Configuration loaded successfully");
        debug!("Loaded config: {:?}", config);

        Ok(config)
    }
}

/// Rejects anything the redis client would not be able to dial
fn validate_redis_url(raw: &str) -> ConfigResult<()> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        key: "REDIS_URL".to_string(),
        reason,
    };

    let parsed = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "redis" | "rediss" | "redis+unix" | "unix" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

/// Helper function to get an env variable with a default value
fn get_env_or_default<T: FromStr>(key: &str, default: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(format!("Could not parse {}: {}", key, e))),
        Err(env::VarError::NotPresent) => {
            debug!("{} not set, using default: {}", key, default);
            default.parse::<T>().map_err(|e| {
                ConfigError::ParseError(format!("Could not parse default for {}: {}", key, e))
            })
        }
        Err(e) => Err(ConfigError::EnvVarError(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_aliases() {
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("Dev".parse::<Environment>(), Ok(Environment::Development));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_store_backend_parsing() {
        assert_eq!("Redis".parse::<StoreBackend>(), Ok(StoreBackend::Redis));
        assert_eq!("mem".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("postgres".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_validate_redis_url() {
        assert!(validate_redis_url("redis://127.0.0.1:6379/0").is_ok());
        assert!(validate_redis_url("rediss://:secret@cache.internal:6380").is_ok());
        assert!(validate_redis_url("http://127.0.0.1:6379").is_err());
        assert!(validate_redis_url("not a url").is_err());
    }

    #[test]
    fn test_zero_operation_timeout_disables_deadline() {
        let cfg = ShortlinkConfig {
            backend: StoreBackend::Memory,
            operation_timeout_ms: 0,
        };
        assert_eq!(cfg.operation_timeout(), None);

        let cfg = ShortlinkConfig {
            backend: StoreBackend::Redis,
            operation_timeout_ms: 250,
        };
        assert_eq!(cfg.operation_timeout(), Some(Duration::from_millis(250)));
    }
}
