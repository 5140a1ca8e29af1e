//! Schema checks for identifiers and request payloads.
//!
//! Every check returns the first violation it finds as `ApiError::ValidationFailed`.
//! Nothing here touches the store.

use crate::{
    errors::ApiError,
    models::{Enrollment, EnrollmentBody, LoginRequest, StudentBody},
};

/// Longest identifier accepted for students and courses.
pub const MAX_ID_LEN: usize = 16;

fn fail<T>(reason: impl Into<String>) -> Result<T, ApiError> {
    Err(ApiError::ValidationFailed(reason.into()))
}

/// Identifiers are 1..=16 ASCII letters or digits.
fn validate_id(label: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return fail(format!("{label} must not be empty"));
    }
    if value.chars().count() > MAX_ID_LEN {
        return fail(format!("{label} must be at most {MAX_ID_LEN} characters"));
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return fail(format!("{label} must contain only letters and digits"));
    }
    Ok(())
}

fn required<'a>(label: &str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    match value {
        Some(v) => Ok(v),
        None => fail(format!("{label} is required")),
    }
}

/// Path segments routed ahead of `/api/v2/enrollments/{studentId}`. A student with one of
/// these ids could never be addressed.
pub const RESERVED_STUDENT_IDS: &[&str] = &["reset"];

pub fn validate_student_id(value: &str) -> Result<(), ApiError> {
    validate_id("Student Id", value)?;
    if RESERVED_STUDENT_IDS.contains(&value) {
        return fail(format!("Student Id \"{value}\" is reserved"));
    }
    Ok(())
}

pub fn validate_course_id(value: &str) -> Result<(), ApiError> {
    validate_id("Course Id", value)
}

/// validate_student_body
///
/// `{studentId}` payloads. Returns the validated id.
pub fn validate_student_body(body: &StudentBody) -> Result<String, ApiError> {
    let student_id = required("Student Id", body.student_id.as_deref())?;
    validate_student_id(student_id)?;
    Ok(student_id.to_string())
}

/// validate_enrollment_body
///
/// `{studentId, courseId}` payloads. Returns the enrollment they describe.
pub fn validate_enrollment_body(body: &EnrollmentBody) -> Result<Enrollment, ApiError> {
    let student_id = required("Student Id", body.student_id.as_deref())?;
    validate_student_id(student_id)?;
    let course_id = required("Course Id", body.course_id.as_deref())?;
    validate_course_id(course_id)?;
    Ok(Enrollment::new(student_id, course_id))
}

/// validate_login
///
/// `{username, password}` payloads. Only presence is checked; credentials are matched
/// by the login workflow.
pub fn validate_login(body: &LoginRequest) -> Result<(String, String), ApiError> {
    let username = required("Username", body.username.as_deref())?;
    if username.trim().is_empty() {
        return fail("Username must not be empty");
    }
    let password = required("Password", body.password.as_deref())?;
    Ok((username.to_string(), password.to_string()))
}
