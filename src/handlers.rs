use crate::{
    AppState,
    auth::AuthUser,
    errors::{ApiError, ApiResult},
    models::{
        ApiResponse, Enrollment, EnrollmentBody, LoginRequest, SessionResponse, Student,
        StudentBody, StudentSummary, User,
    },
    workflow,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

/// Unwraps a JSON body, turning a deserializer rejection into a validation failure.
/// Workflows consume the result only after their role guard has passed.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(inner)| inner).map_err(ApiError::from)
}

// --- Users ---

/// login
///
/// [Public Route] Exchanges `{username, password}` for a five-minute session token.
#[utoipa::path(
    post,
    path = "/api/v2/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<SessionResponse>> {
    let issued = workflow::login(state.repo.as_ref(), &state.tokens, body(payload)).await?;
    Ok(Json(SessionResponse {
        success: true,
        message: "Login successful".to_string(),
        token: issued.token,
    }))
}

/// logout
///
/// [Authenticated Route] Acknowledges the end of a session and echoes the presented token.
/// Tokens are not revoked.
#[utoipa::path(
    post,
    path = "/api/v2/users/logout",
    responses(
        (status = 200, description = "Logout successful", body = SessionResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn logout(user: AuthUser) -> ApiResult<Json<SessionResponse>> {
    let token = workflow::logout(&user)?;
    Ok(Json(SessionResponse {
        success: true,
        message: "Logout successful".to_string(),
        token: token.to_string(),
    }))
}

/// list_users
///
/// [Admin Route] Lists every user account. Passwords are never serialized.
#[utoipa::path(
    get,
    path = "/api/v2/users",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_users(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<User>>>> {
    let users = workflow::list_users(state.repo.as_ref(), &user).await?;
    Ok(Json(ApiResponse::ok("User list", users)))
}

/// reset_users
///
/// [Public Route] Restores the fixture dataset. Same effect as the enrollment reset.
#[utoipa::path(
    post,
    path = "/api/v2/users/reset",
    responses((status = 200, description = "Database reset"))
)]
pub async fn reset_users(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<()>>> {
    workflow::reset(state.repo.as_ref()).await?;
    Ok(Json(ApiResponse::message("User database has been reset")))
}

// --- Enrollments ---

/// list_students
///
/// [Admin Route] Every student with the courses it is enrolled in.
#[utoipa::path(
    get,
    path = "/api/v2/enrollments",
    responses(
        (status = 200, description = "Enrollment information", body = [StudentSummary]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_students(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<StudentSummary>>>> {
    let students = workflow::list_students(state.repo.as_ref(), &user).await?;
    Ok(Json(ApiResponse::ok("Enrollment Information", students)))
}

/// get_student
///
/// [Authenticated Route] Full record of one student.
#[utoipa::path(
    get,
    path = "/api/v2/enrollments/{studentId}",
    params(("studentId" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Found", body = Student),
        (status = 400, description = "Malformed student id"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_student(
    user: AuthUser,
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Student>>> {
    let student = workflow::get_student(state.repo.as_ref(), &user, &student_id).await?;
    Ok(Json(ApiResponse::ok("Student Information", student)))
}

/// create_enrollment
///
/// [Student Route] Enrolls the calling student in a course.
///
/// *Ownership*: the path id and the body's `studentId` must both be the caller's.
#[utoipa::path(
    post,
    path = "/api/v2/enrollments/{studentId}",
    params(("studentId" = String, Path, description = "Student ID")),
    request_body = EnrollmentBody,
    responses(
        (status = 201, description = "Created", body = Enrollment),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Not the owner"),
        (status = 409, description = "Duplicate enrollment")
    )
)]
pub async fn create_enrollment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    payload: Result<Json<EnrollmentBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Enrollment>>)> {
    let enrollment =
        workflow::create_enrollment(state.repo.as_ref(), &user, &student_id, body(payload))
            .await?;
    let message = format!(
        "Student {} && Course {} has been added",
        enrollment.student_id, enrollment.course_id
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message, enrollment))))
}

/// delete_student
///
/// [Student Route] Removes the calling student's record and enrollments, returning the
/// enrollments that remain.
#[utoipa::path(
    delete,
    path = "/api/v2/enrollments/{studentId}",
    params(("studentId" = String, Path, description = "Student ID")),
    request_body = StudentBody,
    responses(
        (status = 200, description = "Deleted", body = [Enrollment]),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_student(
    user: AuthUser,
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    payload: Result<Json<StudentBody>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Vec<Enrollment>>>> {
    let remaining =
        workflow::delete_student(state.repo.as_ref(), &user, &student_id, body(payload)).await?;
    Ok(Json(ApiResponse::ok(
        format!("Student {student_id} has been deleted successfully"),
        remaining,
    )))
}

/// reset_enrollments
///
/// [Public Route] Clears and reseeds every collection.
#[utoipa::path(
    post,
    path = "/api/v2/enrollments/reset",
    responses(
        (status = 200, description = "Database reset"),
        (status = 500, description = "Store fault")
    )
)]
pub async fn reset_enrollments(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<()>>> {
    workflow::reset(state.repo.as_ref()).await?;
    Ok(Json(ApiResponse::message("enrollment database has been reset")))
}
