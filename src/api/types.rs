use serde::Serialize;

use crate::AuthError;

/// JSON error body returned by the request filter.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        // every session failure gets the same outward body so a probe
        // cannot tell which check rejected its token
        if err.is_unauthorized() {
            return ErrorResponse {
                error: "Unauthorized".to_owned(),
                code: "UNAUTHORIZED".to_owned(),
            };
        }

        let code = match err {
            AuthError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            AuthError::PasswordHashError => "PASSWORD_HASH_ERROR",
            AuthError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            AuthError::DatabaseError(_) => "DATABASE_ERROR",
            _ => "INTERNAL_ERROR",
        };

        ErrorResponse {
            error: "Internal error".to_owned(),
            code: code.to_owned(),
        }
    }
}
