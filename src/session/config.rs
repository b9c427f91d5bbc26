use chrono::Duration;
use std::fmt;

use crate::crypto::SecretString;
use crate::AuthError;

/// Header carrying the session token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Required prefix of the header value; the token follows it verbatim.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Minimum required length for the shared signing secret in bytes (HS256).
pub const MIN_SECRET_LENGTH: usize = 32;

/// Configuration for session token issuance and validation.
///
/// One shared symmetric key, fixed at construction, is used for both
/// signing and verification. Key rotation is not supported.
#[derive(Clone)]
pub struct SessionConfig {
    pub(crate) secret: SecretString,
    /// How long issued sessions remain valid. Default: 1 day.
    pub(crate) validity: Duration,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"[REDACTED]")
            .field("validity", &self.validity)
            .finish()
    }
}

impl SessionConfig {
    /// Creates a new session configuration with the given shared secret.
    ///
    /// # Errors
    /// Returns `AuthError::ConfigurationError` if the secret is less than
    /// 32 bytes.
    pub fn new(secret: impl Into<String>) -> Result<Self, AuthError> {
        let secret = secret.into();

        if secret.len() < MIN_SECRET_LENGTH {
            return Err(AuthError::ConfigurationError(format!(
                "session secret must be at least {MIN_SECRET_LENGTH} bytes, got {}",
                secret.len()
            )));
        }

        Ok(Self {
            secret: SecretString::new(secret),
            validity: Duration::days(1),
        })
    }

    /// Sets the session validity window.
    #[must_use]
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    /// Returns the configured validity window.
    pub fn validity(&self) -> Duration {
        self.validity
    }
}
