use super::hash::encode_base62;

/// Longest identifier a 64-bit counter can produce
pub const MAX_IDENTIFIER_LEN: usize = 11;

/// Turns an allocated counter value into the public shortlink identifier
pub fn generate_identifier(counter: u64) -> String {
    encode_base62(counter)
}

/// True when `candidate` could have been produced by [`generate_identifier`]
pub fn is_valid_identifier(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= MAX_IDENTIFIER_LEN
        && candidate.bytes().all(|b| b.is_ascii_alphanumeric())
}
