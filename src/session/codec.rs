use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{SessionClaims, SessionConfig};
use crate::AuthError;

/// Encodes and decodes session tokens (HS256, shared symmetric key).
///
/// Decoding verifies the signature and enforces the `exp` claim with zero
/// leeway: a token is expired exactly when its expiry is before now.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    pub fn new(config: &SessionConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Signs and serializes the claims into a compact token string.
    pub fn encode(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenInvalid)
    }

    /// Decodes and verifies a token, returning its claims.
    ///
    /// An elapsed `exp` maps to `TokenExpired`; a bad signature, malformed
    /// token or missing required claim maps to `TokenInvalid`.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })?;

        Ok(token_data.claims)
    }
}
