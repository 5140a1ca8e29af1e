//! Access control applied after authentication.
//!
//! Guards are plain predicates over a verified identity. Callers run them in a fixed
//! order (role, then ownership) and stop at the first failure.

use crate::{auth::AuthUser, errors::ApiError, models::Role};

/// RoleGuard
///
/// Which identities may reach an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGuard {
    /// Only `admin` tokens.
    Admin,
    /// Only `student` tokens.
    Student,
    /// Any verified token.
    AnyAuthenticated,
}

impl RoleGuard {
    pub fn allows(&self, role: Role) -> bool {
        match self {
            RoleGuard::Admin => role == Role::Admin,
            RoleGuard::Student => role == Role::Student,
            RoleGuard::AnyAuthenticated => true,
        }
    }

    pub fn check(&self, user: &AuthUser) -> Result<(), ApiError> {
        if self.allows(user.role()) {
            return Ok(());
        }

        tracing::warn!(
            username = %user.claims.username,
            role = %user.role(),
            required = ?self,
            "role check failed"
        );
        Err(ApiError::Forbidden(match self {
            RoleGuard::Admin => "Invalid role, admin access required".to_string(),
            _ => "Invalid role, student access required".to_string(),
        }))
    }
}

/// require_ownership
///
/// Passes only when the token belongs to the student named by the request.
pub fn require_ownership(user: &AuthUser, student_id: &str) -> Result<(), ApiError> {
    if user.student_id() == Some(student_id) {
        return Ok(());
    }

    tracing::warn!(
        username = %user.claims.username,
        target = %student_id,
        "ownership check failed"
    );
    Err(ApiError::Forbidden(
        "You are not allowed to modify another student's data".to_string(),
    ))
}
