use url::Url;
use validator::ValidationError;

use crate::utils::id_generator::is_valid_identifier;

/// Validates that a URL string is properly formatted and uses http/https
pub fn validate_url(url_str: &str) -> Result<(), ValidationError> {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.host().is_none() {
                let mut err = ValidationError::new("url_host");
                err.message = Some("URL must have a host".into());
                return Err(err);
            }

            if url.scheme() != "http" && url.scheme() != "https" {
                let mut err = ValidationError::new("url_scheme");
                err.message = Some("URL scheme must be http or https".into());
                return Err(err);
            }

            Ok(())
        }
        Err(_) => {
            let mut err = ValidationError::new("url_format");
            err.message = Some("Invalid URL format".into());
            Err(err)
        }
    }
}

/// Validates that a shortlink is 1-11 ASCII alphanumerics
pub fn validate_shortlink(shortlink: &str) -> Result<(), ValidationError> {
    if is_valid_identifier(shortlink) {
        return Ok(());
    }

    let mut err = ValidationError::new("shortlink_format");
    err.message = Some("Shortlink must be 1 to 11 alphanumeric characters".into());
    Err(err)
}
