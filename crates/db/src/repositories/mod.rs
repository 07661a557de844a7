//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod api_key;
pub mod environment;
pub mod error;
pub mod event;
pub mod project;
pub mod session;
pub mod user;
pub mod verification_token;

pub use account::{AccountRepository, NewAccount, OAUTH_ACCOUNT_TYPE};
pub use api_key::{ApiKeyRepository, CreatedApiKey};
pub use environment::EnvironmentRepository;
pub use error::RepositoryError;
pub use event::{EventRepository, NewEvent};
pub use project::ProjectRepository;
pub use session::SessionRepository;
pub use user::{NewUser, UserRepository};
pub use verification_token::VerificationTokenRepository;
