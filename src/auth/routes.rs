//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /auth/google/code` - Flow A: authorization code → session token
/// - `POST /auth/google/id-token` - Flow B: provider ID token → session token
/// - `GET /api/me` - Protected resource, returns the authenticated subject
/// - `GET /` - Root greeting
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth/google/code", post(handlers::google_auth_with_code))
        .route(
            "/auth/google/id-token",
            post(handlers::google_auth_with_id_token),
        )
        .route("/api/me", get(handlers::me_handler))
        .route("/", get(handlers::root_handler))
}
