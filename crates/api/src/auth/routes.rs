//! `/api/auth` handlers.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use eventi_core::auth::safe_callback_path;
use eventi_shared::Session;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::AuthError;
use super::cookies::{
    CALLBACK_COOKIE, SESSION_COOKIE, STATE_COOKIE, flow_cookie, removal, session_cookie,
};
use crate::AppState;
use crate::error::ApiError;

/// Creates the auth router, mounted at `/api/auth`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/providers", get(providers))
        .route("/signin/{provider}", get(sign_in))
        .route("/callback/{provider}", get(callback))
        .route("/signout", post(sign_out))
        .route("/session", get(session))
}

/// A configured provider as listed by `/api/auth/providers`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    /// Provider ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Always `oauth`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Where to start sign-in.
    pub signin_url: String,
    /// Where the provider sends the browser back.
    pub callback_url: String,
}

/// Query string of `/api/auth/signin/{provider}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInParams {
    callback_url: Option<String>,
}

/// Query string the provider sends back.
#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// GET /api/auth/providers - List configured providers.
async fn providers(State(state): State<AppState>) -> Json<BTreeMap<String, ProviderInfo>> {
    let base = state.auth.config().base_url.trim_end_matches('/');
    let listed = state
        .auth
        .providers()
        .map(|p| {
            let info = ProviderInfo {
                id: p.id().to_string(),
                name: p.name().to_string(),
                kind: "oauth".to_string(),
                signin_url: format!("{base}/api/auth/signin/{}", p.id()),
                callback_url: state.auth.redirect_uri(p.id()),
            };
            (info.id.clone(), info)
        })
        .collect();

    Json(listed)
}

/// GET /api/auth/signin/{provider} - Redirect to the provider.
async fn sign_in(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<SignInParams>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let config = state.auth.config();

    match state.auth.sign_in(&provider, params.callback_url.as_deref()) {
        Ok(started) => {
            let jar = jar
                .add(flow_cookie(STATE_COOKIE, started.state, config))
                .add(flow_cookie(CALLBACK_COOKIE, started.callback_path, config));
            (jar, Redirect::to(&started.authorization_url))
        }
        Err(e) => {
            warn!(provider = %provider, error = %e, "Sign-in could not start");
            (jar, error_redirect(&config.sign_in_path, &e))
        }
    }
}

/// GET /api/auth/callback/{provider} - Finish sign-in and open a session.
async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> Response {
    let config = state.auth.config();
    let expected_state = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    let callback_path = jar.get(CALLBACK_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(removal(STATE_COOKIE)).remove(removal(CALLBACK_COOKIE));

    let result = match (params.error, params.code) {
        (Some(error), _) => Err(AuthError::AccessDenied(error)),
        (None, None) => Err(AuthError::Callback("missing authorization code".to_string())),
        (None, Some(code)) => {
            state
                .auth
                .complete_sign_in(
                    &provider,
                    &code,
                    params.state.as_deref(),
                    expected_state.as_deref(),
                )
                .await
        }
    };

    match result {
        Ok(signed_in) => {
            let jar = jar.add(session_cookie(
                signed_in.session_token,
                signed_in.expires,
                config,
            ));
            let target = safe_callback_path(callback_path.as_deref(), &config.base_url);
            (jar, Redirect::to(&target)).into_response()
        }
        // The flow cookies are spent either way.
        Err(e) if e.is_server_error() => (jar, ApiError::from(e)).into_response(),
        Err(e) => {
            warn!(provider = %provider, error = %e, "Sign-in failed");
            (jar, error_redirect(&config.sign_in_path, &e)).into_response()
        }
    }
}

/// POST /api/auth/signout - End the session and return to the sign-in page.
async fn sign_out(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.auth.sign_out(cookie.value()).await?;
    }

    let jar = jar.remove(removal(SESSION_COOKIE));
    Ok((jar, Redirect::to(&state.auth.config().sign_in_path)))
}

/// GET /api/auth/session - Current session, or `null`.
async fn session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Option<Session>>), ApiError> {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        return Ok((jar, Json(None)));
    };

    let Some(session) = state.auth.session(&token).await? else {
        return Ok((jar.remove(removal(SESSION_COOKIE)), Json(None)));
    };

    // Keep the cookie in step with a possibly extended expiry.
    let jar = jar.add(session_cookie(token, session.expires, state.auth.config()));
    Ok((jar, Json(Some(session))))
}

fn error_redirect(sign_in_path: &str, error: &AuthError) -> Redirect {
    Redirect::to(&format!("{sign_in_path}?error={}", error.code()))
}
