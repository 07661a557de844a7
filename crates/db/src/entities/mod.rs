//! `SeaORM` entity definitions.
//!
//! Auth tables (`users`, `accounts`, `sessions`, `verification_tokens`) follow
//! the layout the OAuth adapter expects; product tables (`projects`,
//! `environments`, `api_keys`, `events`) hang off users.

pub mod prelude;

pub mod accounts;
pub mod api_keys;
pub mod environments;
pub mod events;
pub mod projects;
pub mod sessions;
pub mod users;
pub mod verification_tokens;
