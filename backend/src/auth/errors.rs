//! Custom error types specific to authentication failures.
//!
//! Each variant maps to a fixed HTTP status, a machine-readable code and a
//! human description. Clients switch on the code. Note that `invalid_header`
//! and `invalid_claims` each span both 400 and 401.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::errors::coded_error_response;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingHeader,
    #[error("Authorization header must start with \"Bearer\".")]
    InvalidScheme,
    #[error("Token not found.")]
    TokenNotFound,
    #[error("Authorization header must be bearer token.")]
    NotBearerToken,
    #[error("Authorization malformed.")]
    MissingKeyId,
    #[error("Unable to find the appropriate key.")]
    UnknownKey,
    #[error("Token signature could not be verified.")]
    InvalidSignature,
    #[error("Token expired.")]
    TokenExpired,
    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,
    #[error("Unable to parse authentication token.")]
    Malformed,
    #[error("Permissions not included in JWT.")]
    MissingPermissions,
    #[error("Permission not found.")]
    PermissionDenied,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader
            | AuthError::InvalidScheme
            | AuthError::TokenNotFound
            | AuthError::NotBearerToken
            | AuthError::MissingKeyId
            | AuthError::UnknownKey
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InvalidClaims => StatusCode::UNAUTHORIZED,
            AuthError::Malformed | AuthError::MissingPermissions => StatusCode::BAD_REQUEST,
            AuthError::PermissionDenied => StatusCode::FORBIDDEN,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims | AuthError::MissingPermissions => "invalid_claims",
            AuthError::PermissionDenied => "unauthorized",
            _ => "invalid_header",
        }
    }

    pub fn description(&self) -> String {
        self.to_string()
    }

    /// Classifies a failure reported while decoding and validating a token
    /// whose header was already accepted.
    pub(crate) fn from_jwt(err: &jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::InvalidClaims,
            ErrorKind::MissingRequiredClaim(claim) if claim == "aud" || claim == "iss" => {
                AuthError::InvalidClaims
            }
            _ => AuthError::Malformed,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        coded_error_response(self.status(), self.code(), &self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::{Error as JwtError, ErrorKind};

    #[test]
    fn status_and_code_follow_the_published_table() {
        let cases = [
            (AuthError::MissingHeader, 401, "invalid_header"),
            (AuthError::InvalidScheme, 401, "invalid_header"),
            (AuthError::TokenNotFound, 401, "invalid_header"),
            (AuthError::NotBearerToken, 401, "invalid_header"),
            (AuthError::MissingKeyId, 401, "invalid_header"),
            (AuthError::UnknownKey, 401, "invalid_header"),
            (AuthError::InvalidSignature, 401, "invalid_header"),
            (AuthError::TokenExpired, 401, "token_expired"),
            (AuthError::InvalidClaims, 401, "invalid_claims"),
            (AuthError::Malformed, 400, "invalid_header"),
            (AuthError::MissingPermissions, 400, "invalid_claims"),
            (AuthError::PermissionDenied, 403, "unauthorized"),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status().as_u16(), status, "{:?}", err);
            assert_eq!(err.code(), code, "{:?}", err);
        }
    }

    #[test]
    fn jwt_failures_are_classified() {
        let classify = |kind: ErrorKind| AuthError::from_jwt(&JwtError::from(kind));

        assert_eq!(classify(ErrorKind::InvalidSignature), AuthError::InvalidSignature);
        assert_eq!(classify(ErrorKind::ExpiredSignature), AuthError::TokenExpired);
        assert_eq!(classify(ErrorKind::InvalidAudience), AuthError::InvalidClaims);
        assert_eq!(classify(ErrorKind::InvalidIssuer), AuthError::InvalidClaims);
        assert_eq!(classify(ErrorKind::InvalidToken), AuthError::Malformed);
        assert_eq!(classify(ErrorKind::InvalidAlgorithm), AuthError::Malformed);
        assert_eq!(
            classify(ErrorKind::MissingRequiredClaim("exp".to_string())),
            AuthError::Malformed
        );
        assert_eq!(
            classify(ErrorKind::MissingRequiredClaim("aud".to_string())),
            AuthError::InvalidClaims
        );
        assert_eq!(
            classify(ErrorKind::MissingRequiredClaim("iss".to_string())),
            AuthError::InvalidClaims
        );
    }
}
