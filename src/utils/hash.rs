use sha2::{Digest, Sha256};

/// Digits, then lowercase, then uppercase. Matches the identifiers already in the keyspace.
pub const BASE62_CHARSET: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Converts a number to its base62 representation, most significant digit first
pub fn encode_base62(mut num: u64) -> String {
    const BASE: u64 = 62;

    if num == 0 {
        return "0".to_string();
    }

    let mut result = Vec::with_capacity(11);

    while num > 0 {
        result.push(BASE62_CHARSET[(num % BASE) as usize] as char);
        num /= BASE;
    }

    result.iter().rev().collect()
}

/// Hex-encoded SHA-256 of a URL, used only as the reverse-index key
pub fn url_fingerprint(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    format!("{:x}", digest)
}
