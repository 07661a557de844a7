//! HTTP layer with Axum routes and middleware.
//!
//! This crate provides:
//! - OAuth sign-in with database sessions (`/api/auth`)
//! - The route gate that guards every non-public path
//! - The sign-in page and health check
//! - JSON error responses

pub mod auth;
pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use eventi_core::gate::RouteGate;
use eventi_shared::AppConfig;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::Auth;
use crate::error::ApiError;
use crate::middleware::gate::route_gate;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Authentication service.
    pub auth: Arc<Auth>,
    /// Which paths bypass authentication.
    pub gate: Arc<RouteGate>,
}

impl AppState {
    /// Builds the state from loaded configuration.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        let auth = Auth::new(db.clone(), config.auth.clone());
        Self::with_auth(db, auth, RouteGate::new(&config.gate.public_prefixes))
    }

    /// Builds the state around an existing auth service.
    ///
    /// The sign-in page is always added to the public paths of `gate`.
    #[must_use]
    pub fn with_auth(db: DatabaseConnection, auth: Auth, gate: RouteGate) -> Self {
        let gate = gate.with_public_path(&auth.config().sign_in_path);
        Self {
            db: Arc::new(db),
            auth: Arc::new(auth),
            gate: Arc::new(gate),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::app_routes(&state.auth.config().sign_in_path))
        .fallback(not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            route_gate,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError(eventi_shared::AppError::NotFound("route".to_string()))
}

