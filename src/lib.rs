//! Session and authentication backbone for a social networking backend.
//!
//! The core of this crate is stateful JWT session management with
//! server-side revocation: tokens are bound to a client fingerprint
//! (IP address + user agent) at issuance, every issued token is persisted
//! as a [`SessionTokenRecord`], and validation checks signature, expiry,
//! revocation status and fingerprint in a fixed order. Signing out
//! invalidates the presented token, or every token of the user.
//!
//! # Example
//!
//! ```ignore
//! use palisade::session::{Fingerprint, SessionConfig, SessionService};
//!
//! let config = SessionConfig::new("a-shared-secret-of-at-least-32-bytes")?;
//! let sessions = SessionService::new(token_repo, user_repo, config);
//!
//! let fingerprint = Fingerprint::new("1.2.3.4", "Mozilla/5.0");
//! let token = sessions.issue(&principal, &fingerprint).await?;
//!
//! // later, on each request
//! let identity = sessions.validate(&token, &fingerprint).await?;
//! ```

pub mod actions;
pub mod crypto;
pub mod events;
pub mod mail;
pub mod repository;
pub mod session;

#[cfg(feature = "actix")]
pub mod api;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use crypto::SecretString;
pub use repository::SessionTokenRecord;
pub use repository::SessionTokenRepository;
pub use repository::User;
pub use repository::UserRepository;
pub use repository::VerificationToken;
pub use repository::VerificationTokenRepository;
pub use session::{Fingerprint, SessionConfig, SessionIdentity, SessionPrincipal, SessionService};

#[cfg(any(test, feature = "mocks"))]
pub use repository::{
    MockSessionTokenRepository, MockUserRepository, MockVerificationTokenRepository,
};

pub use events::register_event_listeners;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Token is malformed or its signature does not verify.
    TokenInvalid,
    /// Token's encoded expiry has elapsed.
    TokenExpired,
    /// Token has no stored record, or its record was invalidated.
    TokenRevoked,
    /// The subject of the token no longer references a known user.
    UserNotFound,
    /// Request IP or user agent disagrees with the claims fixed at issuance.
    FingerprintMismatch,
    /// Unknown username/email or wrong password; never says which.
    InvalidCredentials,
    /// Account exists but has not been activated.
    AccountDisabled,
    UserAlreadyExists,
    PasswordHashError,
    ConfigurationError(String),
    DatabaseError(String),
}

impl std::error::Error for AuthError {}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::TokenInvalid => write!(f, "Invalid token"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::TokenRevoked => write!(f, "Token has been revoked"),
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::FingerprintMismatch => write!(f, "Client fingerprint mismatch"),
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
            AuthError::AccountDisabled => write!(f, "Account is not activated"),
            AuthError::UserAlreadyExists => write!(f, "Username or email already taken"),
            AuthError::PasswordHashError => write!(f, "Failed to hash password"),
            AuthError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            AuthError::DatabaseError(msg) => write!(f, "Database error: {msg}"),
        }
    }
}

impl AuthError {
    /// True for failures that surface to the client as a plain 401.
    ///
    /// All of these are presented identically at the request boundary so a
    /// stolen-token probe cannot tell which check rejected it; logs keep
    /// the distinction.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AuthError::TokenInvalid
                | AuthError::TokenExpired
                | AuthError::TokenRevoked
                | AuthError::UserNotFound
                | AuthError::FingerprintMismatch
                | AuthError::InvalidCredentials
                | AuthError::AccountDisabled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_failures_are_unauthorized() {
        assert!(AuthError::TokenInvalid.is_unauthorized());
        assert!(AuthError::TokenExpired.is_unauthorized());
        assert!(AuthError::TokenRevoked.is_unauthorized());
        assert!(AuthError::UserNotFound.is_unauthorized());
        assert!(AuthError::FingerprintMismatch.is_unauthorized());
        assert!(AuthError::InvalidCredentials.is_unauthorized());
    }

    #[test]
    fn test_infrastructure_failures_are_not_unauthorized() {
        assert!(!AuthError::DatabaseError("oops".to_owned()).is_unauthorized());
        assert!(!AuthError::ConfigurationError("oops".to_owned()).is_unauthorized());
        assert!(!AuthError::PasswordHashError.is_unauthorized());
        assert!(!AuthError::UserAlreadyExists.is_unauthorized());
    }

    #[test]
    fn test_display_does_not_leak_credential_detail() {
        // one undifferentiated message for unknown user and wrong password
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
    }
}
