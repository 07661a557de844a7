//! Core logic for Eventi.
//!
//! This crate contains pure logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `auth` - Session tokens, OAuth state, API keys, redirect targets
//! - `gate` - Which request paths bypass authentication

pub mod auth;
pub mod gate;
