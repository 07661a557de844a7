//! Sign-in failures.

use eventi_db::RepositoryError;
use sea_orm::DbErr;
use thiserror::Error;

/// Errors raised while signing a user in or out.
///
/// Everything except the database variants is reported to the browser as an
/// `?error=<code>` redirect to the sign-in page.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No provider with this ID is configured.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Building the provider authorization request failed.
    #[error("Could not start sign-in: {0}")]
    SignIn(String),

    /// The user declined at the provider.
    #[error("Access denied by provider: {0}")]
    AccessDenied(String),

    /// The returned `state` did not match the one issued.
    #[error("OAuth state mismatch")]
    InvalidState,

    /// Code exchange or profile fetch failed.
    #[error("Provider callback failed: {0}")]
    Callback(String),

    /// The provider did not disclose an email address.
    #[error("Provider returned no email address")]
    MissingEmail,

    /// The email belongs to a user who signed up through another account.
    #[error("Email is already linked to another account")]
    AccountNotLinked,

    /// Database read failed.
    #[error(transparent)]
    Database(#[from] DbErr),

    /// Database write failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Returns the error code placed in the sign-in page query string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownProvider(_) => "Configuration",
            Self::SignIn(_) => "OAuthSignin",
            Self::AccessDenied(_) => "AccessDenied",
            Self::InvalidState | Self::Callback(_) | Self::MissingEmail => "OAuthCallback",
            Self::AccountNotLinked => "OAuthAccountNotLinked",
            Self::Database(_) | Self::Repository(_) => "Callback",
        }
    }

    /// Returns true for failures that are ours rather than the user's or the
    /// provider's.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Repository(_))
    }
}
