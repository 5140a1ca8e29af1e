//! Request workflows over the record store.
//!
//! Each operation runs its stages in a fixed order: role guard, ownership of the path id,
//! body decoding and validation, then the store call. The first failing stage ends the
//! request, so a rejected request never reaches the store and a caller never learns
//! anything about the body rules of a record they do not own.

use crate::{
    auth::{AuthUser, IssuedToken, TokenService},
    errors::{ApiError, ApiResult},
    guards::{RoleGuard, require_ownership},
    models::{Enrollment, EnrollmentBody, LoginRequest, Student, StudentBody, StudentSummary, User},
    repository::Repository,
    validation::{validate_enrollment_body, validate_login, validate_student_body, validate_student_id},
};

// --- Accounts ---

/// login
///
/// Matches `{username, password}` against the user collection and issues a session token.
pub async fn login(
    repo: &dyn Repository,
    tokens: &TokenService,
    payload: ApiResult<LoginRequest>,
) -> ApiResult<IssuedToken> {
    let (username, password) = validate_login(&payload?)?;

    let user = repo
        .find_user(&username)
        .await?
        .filter(|u| u.password == password)
        .ok_or_else(|| {
            tracing::warn!(%username, "login rejected");
            ApiError::AuthFailed
        })?;

    let issued = tokens.issue(&user)?;
    tracing::info!(%username, role = %user.role, jti = %issued.claims.jti, "session token issued");
    Ok(issued)
}

/// logout
///
/// Tokens are not tracked server-side, so this only acknowledges the caller and hands
/// back the token it presented; that token stays valid until it expires.
pub fn logout(user: &AuthUser) -> ApiResult<&str> {
    RoleGuard::AnyAuthenticated.check(user)?;
    tracing::info!(username = %user.claims.username, jti = %user.claims.jti, "logout");
    Ok(&user.token)
}

/// list_users
///
/// Admin only.
pub async fn list_users(repo: &dyn Repository, user: &AuthUser) -> ApiResult<Vec<User>> {
    RoleGuard::Admin.check(user)?;
    Ok(repo.list_users().await?)
}

// --- Enrollments ---

/// list_students
///
/// Admin only. Every student projected to `{studentId, courses: [{courseId}]}`.
pub async fn list_students(
    repo: &dyn Repository,
    user: &AuthUser,
) -> ApiResult<Vec<StudentSummary>> {
    RoleGuard::Admin.check(user)?;
    let students = repo.list_students().await?;
    Ok(students.iter().map(StudentSummary::from).collect())
}

/// get_student
///
/// Any authenticated caller may read any student record.
pub async fn get_student(
    repo: &dyn Repository,
    user: &AuthUser,
    student_id: &str,
) -> ApiResult<Student> {
    RoleGuard::AnyAuthenticated.check(user)?;
    validate_student_id(student_id)?;

    repo.find_student(student_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student does not exist".to_string()))
}

/// create_enrollment
///
/// A student enrolls themselves in a course. Both the path id and the body's
/// `studentId` must name the caller. A second request for the same pair is a conflict
/// and leaves the store as it was.
pub async fn create_enrollment(
    repo: &dyn Repository,
    user: &AuthUser,
    path_student_id: &str,
    payload: ApiResult<EnrollmentBody>,
) -> ApiResult<Enrollment> {
    // 1. Role
    RoleGuard::Student.check(user)?;

    // 2. Ownership of the addressed record
    validate_student_id(path_student_id)?;
    require_ownership(user, path_student_id)?;

    // 3. Body, which must name the caller as well
    let enrollment = validate_enrollment_body(&payload?)?;
    require_ownership(user, &enrollment.student_id)?;

    // 4. Atomic duplicate check and insert
    if !repo.insert_enrollment(enrollment.clone()).await? {
        tracing::warn!(
            student_id = %enrollment.student_id,
            course_id = %enrollment.course_id,
            "duplicate enrollment rejected"
        );
        return Err(ApiError::Conflict(format!(
            "Student {} is already enrolled in course {}",
            enrollment.student_id, enrollment.course_id
        )));
    }

    tracing::info!(
        student_id = %enrollment.student_id,
        course_id = %enrollment.course_id,
        "enrollment created"
    );
    Ok(enrollment)
}

/// delete_student
///
/// A student removes their own record, together with their enrollments. Returns the
/// enrollments remaining in the store.
pub async fn delete_student(
    repo: &dyn Repository,
    user: &AuthUser,
    path_student_id: &str,
    payload: ApiResult<StudentBody>,
) -> ApiResult<Vec<Enrollment>> {
    // 1. Role
    RoleGuard::Student.check(user)?;

    // 2. Ownership of the addressed record
    validate_student_id(path_student_id)?;
    require_ownership(user, path_student_id)?;

    // 3. Body
    let student_id = validate_student_body(&payload?)?;
    require_ownership(user, &student_id)?;

    // 4. Cascading removal
    let remaining = repo
        .remove_student(&student_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student does not exist".to_string()))?;

    tracing::info!(%student_id, "student deleted");
    Ok(remaining)
}

/// reset
///
/// Restores the fixture dataset in every collection. Unauthenticated and idempotent.
pub async fn reset(repo: &dyn Repository) -> ApiResult<()> {
    repo.reset_all().await?;
    tracing::info!("record store reset to fixture state");
    Ok(())
}
