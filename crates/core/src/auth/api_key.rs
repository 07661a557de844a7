//! API key generation and hashing.
//!
//! Only a SHA-256 hash and a short display prefix are persisted. The hash is
//! deterministic so the stored value can carry a global unique index and be
//! looked up directly from a presented key.

use sha2::{Digest, Sha256};

/// Prefix of every API key.
pub const API_KEY_PREFIX: &str = "ei_";

/// Number of leading key characters kept for display.
pub const DISPLAY_PREFIX_LEN: usize = 12;

const SECRET_LEN: usize = 43;

/// A freshly generated key. `plaintext` is shown to the user exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedApiKey {
    /// The full key.
    pub plaintext: String,
    /// SHA-256 hex digest of the key.
    pub hash: String,
    /// Displayable prefix, e.g. `ei_AbCdEfGh...`.
    pub prefix: String,
}

/// Generates a new API key.
///
/// # Example
///
/// ```
/// use eventi_core::auth::{generate_api_key, hash_api_key};
///
/// let key = generate_api_key();
/// assert!(key.plaintext.starts_with("ei_"));
/// assert_eq!(hash_api_key(&key.plaintext), key.hash);
/// ```
#[must_use]
pub fn generate_api_key() -> GeneratedApiKey {
    let bytes: [u8; 32] = rand::random();
    let plaintext = format!("{API_KEY_PREFIX}{}", base64_url::encode(&bytes));

    GeneratedApiKey {
        hash: hash_api_key(&plaintext),
        prefix: display_prefix(&plaintext),
        plaintext,
    }
}

/// Hashes an API key for storage and lookup.
#[must_use]
pub fn hash_api_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Returns the displayable prefix of a key.
#[must_use]
pub fn display_prefix(key: &str) -> String {
    let head: String = key.chars().take(DISPLAY_PREFIX_LEN).collect();
    format!("{head}...")
}

/// Checks the shape of a presented key before touching the database.
#[must_use]
pub fn is_well_formed(key: &str) -> bool {
    key.strip_prefix(API_KEY_PREFIX).is_some_and(|secret| {
        secret.len() == SECRET_LEN
            && secret
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_generated_key_shape() {
        let key = generate_api_key();

        assert!(key.plaintext.starts_with(API_KEY_PREFIX));
        assert!(is_well_formed(&key.plaintext));
        assert_eq!(key.hash.len(), 64);
        assert_eq!(key.prefix.len(), DISPLAY_PREFIX_LEN + 3);
        assert!(key.prefix.ends_with("..."));
        assert!(key.plaintext.starts_with(key.prefix.trim_end_matches("...")));
    }

    #[test]
    fn test_prefix_does_not_reveal_secret() {
        let key = generate_api_key();
        assert!(!key.prefix.contains(&key.plaintext));
    }

    #[test]
    fn test_known_hash() {
        assert_eq!(
            hash_api_key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_malformed_keys() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("ei_short"));
        assert!(!is_well_formed(&format!("sk_{}", "a".repeat(SECRET_LEN))));
        assert!(!is_well_formed(&format!("ei_{}", "!".repeat(SECRET_LEN))));
        assert!(is_well_formed(&format!("ei_{}", "a".repeat(SECRET_LEN))));
    }

    proptest! {
        #[test]
        fn prop_hash_is_deterministic_and_distinguishing(a in ".{0,64}", b in ".{0,64}") {
            prop_assert_eq!(hash_api_key(&a), hash_api_key(&a));
            if a != b {
                prop_assert_ne!(hash_api_key(&a), hash_api_key(&b));
            }
        }
    }
}
