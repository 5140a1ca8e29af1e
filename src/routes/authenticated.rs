use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Routes behind the `AuthUser` layer. Student-only operations (create enrollment,
/// delete student) check role and ownership in the workflow.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST /api/v2/users/logout
        .route("/api/v2/users/logout", post(handlers::logout))
        // GET    /api/v2/enrollments/{studentId}  any authenticated caller
        // POST   /api/v2/enrollments/{studentId}  the student themselves
        // DELETE /api/v2/enrollments/{studentId}  the student themselves
        .route(
            "/api/v2/enrollments/{student_id}",
            get(handlers::get_student)
                .post(handlers::create_enrollment)
                .delete(handlers::delete_student),
        )
}
