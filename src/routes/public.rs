use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a token: liveness, login and the fixture resets.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers and tests.
        .route("/health", get(|| async { "ok" }))
        // POST /api/v2/users/login
        // Exchanges credentials for a session token.
        .route("/api/v2/users/login", post(handlers::login))
        // POST /api/v2/users/reset and /api/v2/enrollments/reset
        // Both restore every collection to the fixture dataset.
        .route("/api/v2/users/reset", post(handlers::reset_users))
        .route("/api/v2/enrollments/reset", post(handlers::reset_enrollments))
}
