use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Listing endpoints restricted to the `admin` role. Mounted behind the same
/// authentication layer as the authenticated routes; the role itself is checked by
/// the workflow so a student token gets a 403 rather than a 401.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /api/v2/users
        .route("/api/v2/users", get(handlers::list_users))
        // GET /api/v2/enrollments
        // Every student with `{studentId, courses: [{courseId}]}`.
        .route("/api/v2/enrollments", get(handlers::list_students))
}
