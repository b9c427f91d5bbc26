use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// One-shot opaque token mailed out at sign-up to activate an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationToken {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

#[async_trait]
pub trait VerificationTokenRepository: Send + Sync {
    async fn create_verification_token(
        &self,
        token: VerificationToken,
    ) -> Result<VerificationToken, AuthError>;

    async fn find_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<VerificationToken>, AuthError>;

    /// Consumes a token after successful activation.
    async fn delete_verification_token(&self, token: &str) -> Result<(), AuthError>;
}
