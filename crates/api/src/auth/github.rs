//! GitHub OAuth provider.
//!
//! GitHub may hide the address on `/user`; the primary address from
//! `/user/emails` is used instead.

use async_trait::async_trait;
use eventi_shared::GitHubConfig;
use serde::Deserialize;
use url::Url;

use super::{AuthError, IdentityProvider, ProviderProfile, ProviderTokens};

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const API_URL: &str = "https://api.github.com";
const SCOPE: &str = "read:user user:email";
const USER_AGENT: &str = "eventi";

/// GitHub OAuth app credentials plus an HTTP client.
pub struct GitHubProvider {
    client_id: String,
    client_secret: String,
    http: reqwest::Client,
}

impl GitHubProvider {
    /// Creates the provider from configuration.
    #[must_use]
    pub fn new(config: &GitHubConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            http: reqwest::Client::new(),
        }
    }

    async fn exchange_token(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GitHubTokenResponse, AuthError> {
        let response: GitHubTokenResponse = self
            .http
            .post(TOKEN_URL)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(callback_error)?
            .json()
            .await
            .map_err(callback_error)?;

        // GitHub reports a bad code with 200 and an `error` field.
        if let Some(error) = response.error {
            return Err(AuthError::Callback(
                response.error_description.unwrap_or(error),
            ));
        }

        Ok(response)
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        access_token: &str,
    ) -> Result<T, AuthError> {
        self.http
            .get(format!("{API_URL}{path}"))
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(access_token)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(callback_error)?
            .json()
            .await
            .map_err(callback_error)
    }
}

#[async_trait]
impl IdentityProvider for GitHubProvider {
    fn id(&self) -> &str {
        "github"
    }

    fn name(&self) -> &str {
        "GitHub"
    }

    fn authorization_url(&self, state: &str, redirect_uri: &str) -> Result<String, AuthError> {
        Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("scope", SCOPE),
                ("state", state),
            ],
        )
        .map(String::from)
        .map_err(|e| AuthError::SignIn(e.to_string()))
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ProviderProfile, AuthError> {
        let token = self.exchange_token(code, redirect_uri).await?;
        let access_token = token
            .access_token
            .ok_or_else(|| AuthError::Callback("no access token issued".to_string()))?;

        let user: GitHubUser = self.get("/user", &access_token).await?;

        let (email, email_verified) = match user.email {
            Some(email) => (email, false),
            None => {
                let emails: Vec<GitHubEmail> = self.get("/user/emails", &access_token).await?;
                let chosen = emails
                    .iter()
                    .find(|e| e.primary)
                    .or_else(|| emails.first())
                    .ok_or(AuthError::MissingEmail)?;
                (chosen.email.clone(), chosen.verified)
            }
        };

        Ok(ProviderProfile {
            provider_account_id: user.id.to_string(),
            email,
            name: user.name.or(Some(user.login)),
            image: user.avatar_url,
            email_verified,
            tokens: ProviderTokens {
                access_token: Some(access_token),
                refresh_token: token.refresh_token,
                expires_at: token
                    .expires_in
                    .map(|secs| chrono::Utc::now().timestamp() + secs),
                token_type: token.token_type,
                scope: token.scope,
                id_token: None,
            },
        })
    }
}

#[allow(clippy::needless_pass_by_value)]
fn callback_error(e: reqwest::Error) -> AuthError {
    AuthError::Callback(e.to_string())
}

#[derive(Debug, Deserialize)]
struct GitHubTokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    scope: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    id: i64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GitHubProvider {
        GitHubProvider::new(&GitHubConfig {
            client_id: "Iv1.abc".to_string(),
            client_secret: "shh".to_string(),
        })
    }

    #[test]
    fn test_authorization_url() {
        let url = provider()
            .authorization_url("st4te", "http://localhost:8080/api/auth/callback/github")
            .expect("url should build");
        let parsed = Url::parse(&url).expect("valid url");

        assert_eq!(parsed.host_str(), Some("github.com"));
        assert_eq!(parsed.path(), "/login/oauth/authorize");

        let params: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert!(params.contains(&("client_id".into(), "Iv1.abc".into())));
        assert!(params.contains(&("state".into(), "st4te".into())));
        assert!(params.contains(&("scope".into(), SCOPE.into())));
        assert!(params.contains(&(
            "redirect_uri".into(),
            "http://localhost:8080/api/auth/callback/github".into()
        )));
        assert!(!url.contains("shh"));
    }

    #[test]
    fn test_token_error_response_parses() {
        let body = r#"{"error":"bad_verification_code","error_description":"The code passed is incorrect or expired."}"#;
        let parsed: GitHubTokenResponse = serde_json::from_str(body).expect("parses");
        assert!(parsed.access_token.is_none());
        assert_eq!(parsed.error.as_deref(), Some("bad_verification_code"));
    }

    #[test]
    fn test_identity() {
        let github = provider();
        assert_eq!(github.id(), "github");
        assert_eq!(github.name(), "GitHub");
    }
}
