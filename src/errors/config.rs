use std::env::VarError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was present but unreadable.
    #[error("Environment variable error: {0}")]
    EnvVarError(#[from] VarError),

    /// A variable (or its default) did not parse into the expected type.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A variable parsed but its value is not usable.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}
