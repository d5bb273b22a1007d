//! Key layout for everything a shortlink owns in the keyspace.
//!
//! | Key | Holds |
//! |-----|-------|
//! | `next.url.id` | global allocation counter |
//! | `shortlink:{id}:url` | original URL |
//! | `urlhash:{fingerprint}:url` | identifier minted for that URL |
//! | `shortlink:{id}:detail` | JSON detail record |
//!
//! Identifiers and fingerprints are alphanumeric, so the fixed prefixes and
//! suffixes keep the four namespaces disjoint.

/// Singleton counter advanced once per newly minted identifier
pub const COUNTER_KEY: &str = "next.url.id";

pub fn shortlink_key(shortlink: &str) -> String {
    format!("shortlink:{}:url", shortlink)
}

pub fn url_hash_key(fingerprint: &str) -> String {
    format!("urlhash:{}:url", fingerprint)
}

pub fn detail_key(shortlink: &str) -> String {
    format!("shortlink:{}:detail", shortlink)
}
