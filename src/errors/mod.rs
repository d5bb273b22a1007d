use std::io::Error as IoError;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

pub mod config;
pub mod store;

pub use config::ConfigError;
pub use store::{ShortlinkError, StoreError};

#[derive(Debug, Error)]
pub enum AppError {
    // Service-level domain errors
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found error: {0}")]
    NotFound(String),
    #[error("Timeout error: {0}")]
    Timeout(String),
    #[error("Internal error: {0}")]
    Internal(String),
    // Infrastructure/system errors
    #[error("Server error: {0}")]
    Server(#[from] IoError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Logger error: {0}")]
    Logger(String),
    #[error("Store error: {0}")]
    Store(String),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<ShortlinkError> for AppError {
    fn from(err: ShortlinkError) -> Self {
        match err {
            ShortlinkError::NotFound(msg) => AppError::NotFound(msg),
            ShortlinkError::DeadlineExceeded(limit) => {
                error!("Shortlink operation exceeded its deadline of {:?}", limit);
                AppError::Timeout("The storage backend did not respond in time".to_string())
            }
            other => {
                error!("Shortlink storage failure: {}", other);
                AppError::Internal("A storage error occurred".to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Flatten field errors into a single string
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let reasons = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .clone()
                            .unwrap_or_else(|| e.code.clone())
                            .to_string()
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: {}", field, reasons)
            })
            .collect::<Vec<_>>()
            .join("; ");
        AppError::Validation(message)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_)
            | AppError::Server(_)
            | AppError::Config(_)
            | AppError::Logger(_)
            | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_string = self.to_string();
        let (error_type, message) = error_string
            .split_once(':')
            .map(|(t, m)| (t.trim(), m.trim()))
            .unwrap_or(("Error", "An error occurred"));

        let error_message = if message.is_empty() {
            "An error occurred"
        } else {
            message
        };

        let code = self.status_code().as_u16();
        HttpResponse::build(self.status_code()).json(json!({
            "type": error_type.to_uppercase(),
            "message": error_message,
            "status_code": code,
        }))
    }
}
