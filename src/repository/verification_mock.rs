use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{VerificationToken, VerificationTokenRepository};
use crate::AuthError;

/// In-memory verification token store for tests. Clones share the same
/// tokens.
#[derive(Clone, Debug)]
pub struct MockVerificationTokenRepository {
    pub tokens: Arc<Mutex<Vec<VerificationToken>>>,
}

impl MockVerificationTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(Mutex::new(vec![])),
        }
    }
}

impl Default for MockVerificationTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationTokenRepository for MockVerificationTokenRepository {
    async fn create_verification_token(
        &self,
        token: VerificationToken,
    ) -> Result<VerificationToken, AuthError> {
        let mut tokens = self.tokens.lock().unwrap();
        tokens.push(token.clone());
        drop(tokens);

        Ok(token)
    }

    async fn find_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<VerificationToken>, AuthError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.iter().find(|t| t.token == token).cloned())
    }

    async fn delete_verification_token(&self, token: &str) -> Result<(), AuthError> {
        let mut tokens = self.tokens.lock().unwrap();
        tokens.retain(|t| t.token != token);
        drop(tokens);
        Ok(())
    }
}
