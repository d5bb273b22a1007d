use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validations::{validate_shortlink, validate_url};

/// One hundred years; keeps `SET .. EX` well inside what Redis accepts
const MAX_EXPIRATION_MINUTES: i64 = 100 * 365 * 24 * 60;

// DTO for creating a new shortlink
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ShortenRequestDto {
    #[validate(
        length(min = 1, message = "URL is required"),
        custom(function = "validate_url")
    )]
    pub url: String,

    /// Omitted or zero means the shortlink never expires
    #[serde(default)]
    #[validate(range(
        min = 0,
        max = MAX_EXPIRATION_MINUTES,
        message = "Expiration must be between 0 and 100 years in minutes"
    ))]
    pub expiration_in_minutes: i64,
}

impl ShortenRequestDto {
    /// Expiration as the engine expects it; only meaningful after validation
    pub fn expiration_minutes(&self) -> u64 {
        u64::try_from(self.expiration_in_minutes).unwrap_or(0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShortlinkResponseDto {
    pub shortlink: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ShortlinkInfoQuery {
    #[validate(custom(function = "validate_shortlink"))]
    pub shortlink: String,
}

/// Metadata written next to every new shortlink.
///
/// Field names follow the records already stored in the keyspace. Reads hand
/// the stored JSON back untouched, so this type only shapes new writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlDetail {
    pub url: String,
    pub created_at: String,
    pub expiration_in_minutes: u64,
}

impl UrlDetail {
    pub fn new(url: &str, expiration_in_minutes: u64) -> Self {
        Self {
            url: url.to_string(),
            created_at: Utc::now().to_rfc3339(),
            expiration_in_minutes,
        }
    }
}
