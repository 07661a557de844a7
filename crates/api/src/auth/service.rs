//! The authentication service: sign-in, sign-out, and session lookup.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use eventi_core::auth::{
    generate_oauth_state, generate_session_token, safe_callback_path, tokens_match,
};
use eventi_db::entities::users;
use eventi_db::repositories::{NewAccount, NewUser};
use eventi_db::{AccountRepository, RepositoryError, SessionRepository, UserRepository};
use eventi_shared::{AuthConfig, Session, SessionUser};
use sea_orm::{DatabaseConnection, DbErr};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{AuthError, GitHubProvider, IdentityProvider, ProviderProfile};

/// Longest session lifetime honoured, to keep expiry arithmetic in range.
const MAX_SESSION_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// A started sign-in: where to send the browser and what to remember.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    /// Provider consent URL.
    pub authorization_url: String,
    /// CSRF `state` to store and compare on callback.
    pub state: String,
    /// Same-origin path to return to afterwards.
    pub callback_path: String,
}

/// A completed sign-in.
#[derive(Debug, Clone)]
pub struct SignedIn {
    /// Opaque session token for the cookie.
    pub session_token: String,
    /// Session expiry.
    pub expires: DateTime<Utc>,
    /// The signed-in user.
    pub user: users::Model,
    /// True when this sign-in created the user.
    pub is_new_user: bool,
}

/// Authentication service backed by database sessions.
pub struct Auth {
    config: AuthConfig,
    providers: Vec<Arc<dyn IdentityProvider>>,
    users: UserRepository,
    accounts: AccountRepository,
    sessions: SessionRepository,
}

impl Auth {
    /// Creates the service with the providers present in `config`.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: AuthConfig) -> Self {
        let mut providers: Vec<Arc<dyn IdentityProvider>> = Vec::new();
        if let Some(github) = &config.github {
            providers.push(Arc::new(GitHubProvider::new(github)));
        }
        Self::with_providers(db, config, providers)
    }

    /// Creates the service with an explicit provider list.
    #[must_use]
    pub fn with_providers(
        db: DatabaseConnection,
        mut config: AuthConfig,
        providers: Vec<Arc<dyn IdentityProvider>>,
    ) -> Self {
        config.sign_in_path = normalize_sign_in_path(&config.sign_in_path);
        Self {
            config,
            providers,
            users: UserRepository::new(db.clone()),
            accounts: AccountRepository::new(db.clone()),
            sessions: SessionRepository::new(db),
        }
    }

    /// Returns the auth configuration.
    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Returns the configured providers in registration order.
    pub fn providers(&self) -> impl Iterator<Item = &dyn IdentityProvider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    /// Looks up a provider by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownProvider` if it is not configured.
    pub fn provider(&self, id: &str) -> Result<&dyn IdentityProvider, AuthError> {
        self.providers()
            .find(|p| p.id() == id)
            .ok_or_else(|| AuthError::UnknownProvider(id.to_string()))
    }

    /// Returns the callback URL registered with a provider.
    #[must_use]
    pub fn redirect_uri(&self, provider_id: &str) -> String {
        format!(
            "{}/api/auth/callback/{provider_id}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Starts a sign-in with `provider_id`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownProvider` or `AuthError::SignIn`.
    pub fn sign_in(
        &self,
        provider_id: &str,
        callback_url: Option<&str>,
    ) -> Result<SignIn, AuthError> {
        let provider = self.provider(provider_id)?;
        let state = generate_oauth_state();
        let authorization_url =
            provider.authorization_url(&state, &self.redirect_uri(provider_id))?;

        Ok(SignIn {
            authorization_url,
            state,
            callback_path: safe_callback_path(callback_url, &self.config.base_url),
        })
    }

    /// Finishes a sign-in: checks `state`, exchanges the code, resolves the
    /// user, and opens a session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidState` when the state is missing or does not
    /// match, `AuthError::AccountNotLinked` when the email belongs to another
    /// user, provider errors from the exchange, or database errors.
    pub async fn complete_sign_in(
        &self,
        provider_id: &str,
        code: &str,
        returned_state: Option<&str>,
        expected_state: Option<&str>,
    ) -> Result<SignedIn, AuthError> {
        let provider = self.provider(provider_id)?;

        match (returned_state, expected_state) {
            (Some(returned), Some(expected)) if tokens_match(expected, returned) => {}
            _ => return Err(AuthError::InvalidState),
        }

        let profile = provider
            .exchange_code(code, &self.redirect_uri(provider_id))
            .await?;
        let (user, is_new_user) = self.resolve_user(provider_id, profile).await?;

        let session_token = generate_session_token();
        let expires = Utc::now() + self.max_age();
        self.sessions
            .create(user.id, &session_token, expires)
            .await?;

        info!(user_id = %user.id, provider = provider_id, is_new_user, "User signed in");

        Ok(SignedIn {
            session_token,
            expires,
            user,
            is_new_user,
        })
    }

    /// Ends a session. Unknown tokens are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn sign_out(&self, session_token: &str) -> Result<(), DbErr> {
        if self.sessions.delete(session_token).await? {
            info!("User signed out");
        }
        Ok(())
    }

    /// Resolves a session token, extending the session when it is due.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or update fails.
    pub async fn session(&self, session_token: &str) -> Result<Option<Session>, DbErr> {
        let Some((row, user)) = self.sessions.find_with_user(session_token).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        let mut expires = row.expires.with_timezone(&Utc);

        // Refresh at most once per update age.
        if expires - self.max_age() + self.update_age() <= now {
            expires = now + self.max_age();
            self.sessions.update_expiry(session_token, expires).await?;
            debug!(user_id = %user.id, "Session extended");
        }

        Ok(Some(Session {
            user: SessionUser {
                id: user.id,
                name: user.name,
                email: user.email,
                image: user.image,
            },
            expires,
        }))
    }

    async fn resolve_user(
        &self,
        provider_id: &str,
        profile: ProviderProfile,
    ) -> Result<(users::Model, bool), AuthError> {
        if let Some(user) = self
            .accounts
            .find_user_by_account(provider_id, &profile.provider_account_id)
            .await?
        {
            return Ok((user, false));
        }

        if self.users.email_exists(&profile.email).await? {
            return Err(AuthError::AccountNotLinked);
        }

        let tokens = profile.tokens;
        let new_user = NewUser {
            email: profile.email,
            name: profile.name,
            image: profile.image,
            email_verified: profile.email_verified.then(Utc::now),
        };
        let account = NewAccount {
            user_id: Uuid::nil(),
            provider: provider_id.to_string(),
            provider_account_id: profile.provider_account_id,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at: tokens.expires_at,
            token_type: tokens.token_type,
            scope: tokens.scope,
            id_token: tokens.id_token,
        };

        match self.users.create_with_account(new_user, account).await {
            Ok((user, _)) => {
                info!(user_id = %user.id, provider = provider_id, "Created user");
                Ok((user, true))
            }
            // Lost a race with a concurrent sign-up for the same email.
            Err(RepositoryError::Conflict(_)) => Err(AuthError::AccountNotLinked),
            Err(e) => Err(e.into()),
        }
    }

    fn max_age(&self) -> Duration {
        seconds(self.config.session_max_age_secs)
    }

    fn update_age(&self) -> Duration {
        seconds(self.config.session_update_age_secs)
    }
}

fn seconds(secs: u64) -> Duration {
    // Bounded by MAX_SESSION_SECS, so the cast is lossless.
    #[allow(clippy::cast_possible_wrap)]
    Duration::seconds(secs.min(MAX_SESSION_SECS) as i64)
}

/// Gives the sign-in path one leading slash and no trailing one.
///
/// The root cannot be the sign-in page: it has to stay public while every
/// other path is gated, and the gate only matches prefixes.
fn normalize_sign_in_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        warn!(path = %path, "Unusable sign-in path, using /login");
        return "/login".to_string();
    }
    format!("/{trimmed}")
}
