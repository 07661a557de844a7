//! Route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod login;
pub mod me;

/// Creates the router with every application route.
///
/// The sign-in page is mounted at `sign_in_path`. The route gate is applied on
/// top of this by [`crate::create_router`].
pub fn app_routes(sign_in_path: &str) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(login::routes(sign_in_path))
        .merge(me::routes())
        .nest("/api/auth", crate::auth::routes::routes())
}
