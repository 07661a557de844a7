//! Entity re-exports.

pub use super::accounts::Entity as Accounts;
pub use super::api_keys::Entity as ApiKeys;
pub use super::environments::Entity as Environments;
pub use super::events::Entity as Events;
pub use super::projects::Entity as Projects;
pub use super::sessions::Entity as Sessions;
pub use super::users::Entity as Users;
pub use super::verification_tokens::Entity as VerificationTokens;
