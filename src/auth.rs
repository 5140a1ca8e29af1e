use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::ApiError,
    models::{Role, User},
};

/// Session tokens expire five minutes after issuance.
pub const TOKEN_TTL_SECS: i64 = 5 * 60;

/// Claims
///
/// Identity fields signed into every session token and recovered on each request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    pub role: Role,
    /// Issued At (iat), seconds since the epoch.
    pub iat: i64,
    /// Expiration Time (exp), seconds since the epoch. Checked with zero leeway.
    pub exp: i64,
    /// Token id. Logged in place of the token itself.
    pub jti: Uuid,
}

/// IssuedToken
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// TokenService
///
/// Issues and verifies HS256-signed session tokens. Verification is stateless: there is
/// no revocation list, so expiry is the only way a token stops being accepted.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(TOKEN_TTL_SECS),
        }
    }

    /// issue
    ///
    /// Signs a token for a user whose credentials have already been matched.
    pub fn issue(&self, user: &User) -> Result<IssuedToken, ApiError> {
        self.issue_at(user, Utc::now())
    }

    /// issue_at
    ///
    /// Same as `issue` with an explicit issuance instant.
    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<IssuedToken, ApiError> {
        let claims = Claims {
            username: user.username.clone(),
            student_id: user.student_id.clone(),
            role: user.role,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "failed to sign session token");
            ApiError::Internal("Something went wrong.".to_string())
        })?;

        Ok(IssuedToken { token, claims })
    }

    /// verify
    ///
    /// Checks signature, shape and expiry of a raw token and returns its claims.
    pub fn verify(&self, raw: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        match decode::<Claims>(raw, &self.decoding, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => {
                    Err(ApiError::Unauthenticated("Token has expired".to_string()))
                }
                // Bad signature, malformed token, wrong algorithm, missing claims.
                _ => Err(ApiError::Unauthenticated("Invalid token".to_string())),
            },
        }
    }

    /// bearer_token
    ///
    /// Pulls the credential out of an `Authorization: Bearer <token>` header value.
    pub fn bearer_token(header_value: Option<&str>) -> Result<&str, ApiError> {
        let value = header_value.ok_or_else(|| {
            ApiError::Unauthenticated("Authorization header is required".to_string())
        })?;

        value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ApiError::Unauthenticated("Authorization header is not a bearer token".to_string())
            })
    }
}

/// AuthUser Extractor Result
///
/// The verified identity of a request: the decoded claims plus the token string they
/// came from. Handlers take it as an argument; role and ownership checks run on it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: Claims,
    pub token: String,
}

impl AuthUser {
    pub fn role(&self) -> Role {
        self.claims.role
    }

    pub fn student_id(&self) -> Option<&str> {
        self.claims.student_id.as_deref()
    }
}

/// AuthUser Extractor Implementation
///
/// Resolves the bearer token against the `TokenService` held in the application state.
///
/// Rejection: `ApiError::Unauthenticated` (401) on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = TokenService::from_ref(state);

        // 1. Read the Authorization header
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        // 2. Require the Bearer scheme
        let token = TokenService::bearer_token(header_value)?;

        // 3. Check signature and expiry. No store lookup: verification is stateless.

        let claims = tokens.verify(token).inspect_err(|e| {
            tracing::debug!(reason = %e, "rejected bearer token");
        })?;

        Ok(AuthUser {
            claims,
            token: token.to_string(),
        })
    }
}
