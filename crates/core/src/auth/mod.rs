//! Credentials used by the authentication layer.
//!
//! This module provides:
//! - Opaque session tokens and OAuth `state` values
//! - API key generation, hashing, and display prefixes
//! - Sanitizing post-sign-in redirect targets

mod api_key;
mod redirect;
mod token;

pub use api_key::{
    API_KEY_PREFIX, DISPLAY_PREFIX_LEN, GeneratedApiKey, display_prefix, generate_api_key,
    hash_api_key, is_well_formed,
};
pub use redirect::safe_callback_path;
pub use token::{generate_oauth_state, generate_session_token, tokens_match};
