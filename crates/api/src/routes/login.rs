//! The sign-in page.

use axum::{
    Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use eventi_core::auth::safe_callback_path;
use serde::Deserialize;

use crate::AppState;

/// Query string of the sign-in page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginParams {
    error: Option<String>,
    callback_url: Option<String>,
}

/// Creates the sign-in page route at `path`.
pub fn routes(path: &str) -> Router<AppState> {
    Router::new().route(path, get(login_page))
}

/// GET {sign_in_path} - List providers and any sign-in error.
async fn login_page(State(state): State<AppState>, Query(params): Query<LoginParams>) -> Html<String> {
    let config = state.auth.config();
    let callback = safe_callback_path(params.callback_url.as_deref(), &config.base_url);
    let callback = urlencoding::encode(&callback);

    let mut body = String::from("<!doctype html>\n<html><head><title>Sign in</title></head><body>\n<h1>Sign in</h1>\n");

    if let Some(code) = params.error.as_deref() {
        body.push_str(&format!(
            "<p class=\"error\" data-code=\"{}\">{}</p>\n",
            known_code(code),
            error_message(code)
        ));
    }

    body.push_str("<ul>\n");
    let mut any = false;
    for provider in state.auth.providers() {
        any = true;
        body.push_str(&format!(
            "<li><a href=\"/api/auth/signin/{}?callbackUrl={callback}\">Sign in with {}</a></li>\n",
            provider.id(),
            provider.name()
        ));
    }
    body.push_str("</ul>\n");

    if !any {
        body.push_str("<p>No sign-in providers are configured.</p>\n");
    }

    body.push_str("</body></html>\n");
    Html(body)
}

/// Echoes only codes we issue, never raw query input.
fn known_code(code: &str) -> &'static str {
    match code {
        "OAuthSignin" => "OAuthSignin",
        "OAuthCallback" => "OAuthCallback",
        "OAuthAccountNotLinked" => "OAuthAccountNotLinked",
        "AccessDenied" => "AccessDenied",
        "Configuration" => "Configuration",
        "Callback" => "Callback",
        _ => "Default",
    }
}

fn error_message(code: &str) -> &'static str {
    match known_code(code) {
        "OAuthSignin" | "OAuthCallback" | "Callback" => "Try signing in with a different account.",
        "OAuthAccountNotLinked" => {
            "To confirm your identity, sign in with the same account you used originally."
        }
        "AccessDenied" => "Access was denied.",
        "Configuration" => "There is a problem with the server configuration.",
        _ => "Unable to sign in.",
    }
}
