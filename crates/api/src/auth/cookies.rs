//! Cookies set by the sign-in flow.

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use eventi_shared::AuthConfig;

/// Holds the opaque session token.
pub const SESSION_COOKIE: &str = "eventi.session-token";
/// Holds the OAuth `state` issued at sign-in.
pub const STATE_COOKIE: &str = "eventi.state";
/// Holds where to send the browser after sign-in.
pub const CALLBACK_COOKIE: &str = "eventi.callback-url";

/// Lifetime of the state and callback cookies.
const FLOW_COOKIE_MAX_AGE: time::Duration = time::Duration::minutes(15);

/// Builds the session cookie, expiring with the session.
pub fn session_cookie(token: String, expires: DateTime<Utc>, config: &AuthConfig) -> Cookie<'static> {
    let remaining = (expires - Utc::now()).num_seconds().max(0);
    let mut cookie = base(SESSION_COOKIE, token, config);
    cookie.set_max_age(time::Duration::seconds(remaining));
    cookie
}

/// Builds a short-lived cookie carrying sign-in flow data.
pub fn flow_cookie(name: &'static str, value: String, config: &AuthConfig) -> Cookie<'static> {
    let mut cookie = base(name, value, config);
    cookie.set_max_age(FLOW_COOKIE_MAX_AGE);
    cookie
}

/// Builds a removal cookie matching the path the cookie was set on.
pub fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

fn base(name: &'static str, value: String, config: &AuthConfig) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .build()
}
