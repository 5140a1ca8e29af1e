use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Core Records (owned by the record store) ---

/// Role
///
/// The RBAC field carried by users and token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Student,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Student => f.write_str("student"),
        }
    }
}

/// User
///
/// Identity source for token issuance. Seeded at startup and on reset; requests never
/// mutate it. The password is accepted on input but never serialized back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password: String,
    pub role: Role,
    // Only student accounts are bound to a student record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

/// Student
///
/// A student record. `courses` mirrors the student's enrollments in the order they were made.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Student {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub program: String,
    pub courses: Vec<String>,
}

/// Course
///
/// Read-only catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Course {
    pub course_id: String,
    pub course_title: String,
    pub instructors: Vec<String>,
}

/// Enrollment
///
/// Relationship record. At most one record exists per `(studentId, courseId)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Enrollment {
    pub student_id: String,
    pub course_id: String,
}

impl Enrollment {
    pub fn new(student_id: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            course_id: course_id.into(),
        }
    }

    /// The unique key of this relationship.
    pub fn key(&self) -> (String, String) {
        (self.student_id.clone(), self.course_id.clone())
    }
}

// --- Request Payloads (Input Schemas) ---
//
// Every field is optional at the serde level so missing fields surface as a
// validation failure with a readable reason instead of a deserializer rejection.

/// LoginRequest
///
/// Input payload for POST /api/v2/users/login.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    #[schema(example = "admin1")]
    pub username: Option<String>,
    #[schema(example = "pass1")]
    pub password: Option<String>,
}

/// EnrollmentBody
///
/// Input payload for creating an enrollment (POST /api/v2/enrollments/{studentId}).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EnrollmentBody {
    #[schema(example = "S1")]
    pub student_id: Option<String>,
    #[schema(example = "C1")]
    pub course_id: Option<String>,
}

/// StudentBody
///
/// Input payload naming a student (DELETE /api/v2/enrollments/{studentId}).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StudentBody {
    #[schema(example = "S1")]
    pub student_id: Option<String>,
}

// --- Response Schemas (Output) ---

/// ApiResponse
///
/// The JSON envelope shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success envelope without a payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
        }
    }
}

/// SessionResponse
///
/// Output of login and logout. The token sits next to the envelope fields: the freshly
/// issued one on login, the presented one on logout.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

/// CourseRef
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CourseRef {
    pub course_id: String,
}

/// StudentSummary
///
/// Admin listing projection of a student: id plus the courses it is enrolled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StudentSummary {
    pub student_id: String,
    pub courses: Vec<CourseRef>,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        Self {
            student_id: student.student_id.clone(),
            courses: student
                .courses
                .iter()
                .map(|course_id| CourseRef {
                    course_id: course_id.clone(),
                })
                .collect(),
        }
    }
}
