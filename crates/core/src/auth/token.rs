//! Opaque random tokens.

/// Generates a session token: 32 random bytes, URL-safe base64.
#[must_use]
pub fn generate_session_token() -> String {
    let bytes: [u8; 32] = rand::random();
    base64_url::encode(&bytes)
}

/// Generates an OAuth `state` value: 16 random bytes, URL-safe base64.
#[must_use]
pub fn generate_oauth_state() -> String {
    let bytes: [u8; 16] = rand::random();
    base64_url::encode(&bytes)
}

/// Compares two tokens without short-circuiting on the first mismatch.
#[must_use]
pub fn tokens_match(expected: &str, actual: &str) -> bool {
    let (a, b) = (expected.as_bytes(), actual.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
