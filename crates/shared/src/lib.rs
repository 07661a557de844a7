//! Shared types, errors, and configuration for Eventi.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - The session object handed to request handlers

pub mod config;
pub mod error;
pub mod session;

pub use config::{AppConfig, AuthConfig, GateConfig, GitHubConfig};
pub use error::{AppError, AppResult};
pub use session::{Session, SessionUser};
