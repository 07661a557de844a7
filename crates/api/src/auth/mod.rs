//! OAuth sign-in with database sessions.
//!
//! This module provides:
//! - The [`Auth`] service (sign in, sign out, session lookup)
//! - Pluggable identity providers, with GitHub built in
//! - The `/api/auth` handlers
//! - Cookie helpers shared with the route gate

pub mod cookies;
mod error;
mod github;
mod provider;
pub mod routes;
mod service;

pub use error::AuthError;
pub use github::GitHubProvider;
pub use provider::{IdentityProvider, ProviderProfile, ProviderTokens};
pub use service::{Auth, SignIn, SignedIn};
