//! Shared setup for router tests: an in-memory database, a fake provider,
//! and helpers for cookies and bodies.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, Response, header},
};
use eventi_api::auth::{Auth, AuthError, IdentityProvider, ProviderProfile, ProviderTokens};
use eventi_api::{AppState, create_router};
use eventi_core::gate::RouteGate;
use eventi_db::migration::{Migrator, MigratorTrait};
use eventi_shared::AuthConfig;
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tower::ServiceExt;

/// Code the fake provider accepts.
pub const GOOD_CODE: &str = "good-code";
/// Email the fake provider vouches for.
pub const FAKE_EMAIL: &str = "ada@example.com";

/// A provider that never leaves the process.
pub struct FakeProvider;

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn id(&self) -> &str {
        "fake"
    }

    fn name(&self) -> &str {
        "Fake"
    }

    fn authorization_url(&self, state: &str, redirect_uri: &str) -> Result<String, AuthError> {
        Ok(format!(
            "https://fake.example/authorize?state={state}&redirect_uri={}",
            urlencoding::encode(redirect_uri)
        ))
    }

    async fn exchange_code(
        &self,
        code: &str,
        _redirect_uri: &str,
    ) -> Result<ProviderProfile, AuthError> {
        if code != GOOD_CODE {
            return Err(AuthError::Callback("bad code".to_string()));
        }

        Ok(ProviderProfile {
            provider_account_id: "fake-1".to_string(),
            email: FAKE_EMAIL.to_string(),
            name: Some("Ada Lovelace".to_string()),
            image: None,
            email_verified: true,
            tokens: ProviderTokens {
                access_token: Some("fake-access".to_string()),
                ..Default::default()
            },
        })
    }
}

/// A router wired to a fresh database.
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

impl TestApp {
    /// Sends a request through the full router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Sends a GET with an optional `Cookie` header.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(request("GET", uri, cookie)).await
    }

    /// Signs in through the fake provider and returns the session token.
    pub async fn sign_in(&self) -> String {
        let start = self.get("/api/auth/signin/fake?callbackUrl=/projects", None).await;
        let state = cookie_value(start.headers(), "eventi.state").expect("state cookie");

        let callback = self
            .get(
                &format!("/api/auth/callback/fake?code={GOOD_CODE}&state={state}"),
                Some(&format!("eventi.state={state}")),
            )
            .await;
        cookie_value(callback.headers(), "eventi.session-token").expect("session cookie")
    }
}

/// Builds a request.
pub fn request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("valid request")
}

/// Builds the app on an in-memory SQLite database.
pub async fn setup_app() -> TestApp {
    setup_app_with(AuthConfig {
        base_url: "http://localhost:8080".to_string(),
        ..AuthConfig::default()
    })
    .await
}

/// Builds the app with a custom auth configuration.
pub async fn setup_app_with(config: AuthConfig) -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let auth = Auth::with_providers(db.clone(), config, vec![Arc::new(FakeProvider)]);
    let state = AppState::with_auth(db.clone(), auth, RouteGate::default());

    TestApp {
        router: create_router(state),
        db,
    }
}

/// Finds a cookie set by the response, percent-decoded.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| {
            urlencoding::decode(v)
                .map_or_else(|_| v.to_string(), std::borrow::Cow::into_owned)
        })
}

/// Returns the `Location` header.
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}

/// Reads a JSON body.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

/// Reads a text body.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
