//! Route gate middleware.
//!
//! Public paths pass through untouched. Every other request needs a live
//! session: API calls without one get a 401, page requests are redirected to
//! the sign-in page with the original target in `callbackUrl`.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use eventi_shared::Session;

use crate::AppState;
use crate::auth::cookies::SESSION_COOKIE;
use crate::error::ApiError;

/// Gates every non-public route behind a session.
pub async fn route_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if state.gate.is_public(&path) {
        return next.run(request).await;
    }

    let session = match jar.get(SESSION_COOKIE) {
        Some(cookie) => match state.auth.session(cookie.value()).await {
            Ok(session) => session,
            Err(e) => return ApiError::from(e).into_response(),
        },
        None => None,
    };

    if let Some(session) = session {
        request.extensions_mut().insert(session);
        return next.run(request).await;
    }

    if is_api_path(&path) {
        return ApiError::unauthorized("Authentication required").into_response();
    }

    let target = request
        .uri()
        .path_and_query()
        .map_or(path.as_str(), |pq| pq.as_str());
    Redirect::to(&format!(
        "{}?callbackUrl={}",
        state.auth.config().sign_in_path,
        urlencoding::encode(target)
    ))
    .into_response()
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// The session attached by [`route_gate`].
///
/// ```ignore
/// async fn handler(CurrentSession(session): CurrentSession) -> impl IntoResponse {
///     let user_id = session.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(CurrentSession)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}
