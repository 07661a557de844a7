//! The signed-in user's own session.

use axum::{Json, Router, routing::get};
use eventi_shared::Session;

use crate::AppState;
use crate::middleware::gate::CurrentSession;

/// Creates the `/api/me` route. It sits behind the route gate.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/me", get(me))
}

/// GET /api/me - The session attached by the gate.
async fn me(CurrentSession(session): CurrentSession) -> Json<Session> {
    Json(session)
}
