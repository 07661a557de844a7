//! Identity provider abstraction.

use async_trait::async_trait;

use super::AuthError;

/// Tokens returned by a provider's code exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderTokens {
    /// Access token.
    pub access_token: Option<String>,
    /// Refresh token, if the provider issues one.
    pub refresh_token: Option<String>,
    /// Access token expiry, unix seconds.
    pub expires_at: Option<i64>,
    /// Token type, usually `bearer`.
    pub token_type: Option<String>,
    /// Granted scopes.
    pub scope: Option<String>,
    /// OpenID Connect ID token.
    pub id_token: Option<String>,
}

/// The identity a provider vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    /// The provider's stable identifier for the user.
    pub provider_account_id: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// Avatar URL.
    pub image: Option<String>,
    /// Whether the provider has verified the email.
    pub email_verified: bool,
    /// Tokens from the exchange.
    pub tokens: ProviderTokens,
}

/// An OAuth identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short ID used in URLs and the `accounts.provider` column.
    fn id(&self) -> &str;

    /// Human readable name.
    fn name(&self) -> &str;

    /// Builds the URL the browser is sent to for consent.
    fn authorization_url(&self, state: &str, redirect_uri: &str) -> Result<String, AuthError>;

    /// Exchanges an authorization code for the user's profile.
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ProviderProfile, AuthError>;
}
