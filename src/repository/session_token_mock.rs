use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{SessionTokenRecord, SessionTokenRepository};
use crate::AuthError;

/// In-memory token store for tests.
///
/// Clones share the same records, like pool-backed handles share one
/// database.
#[derive(Clone, Debug)]
pub struct MockSessionTokenRepository {
    pub records: Arc<Mutex<Vec<SessionTokenRecord>>>,
}

impl MockSessionTokenRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(vec![])),
        }
    }
}

impl Default for MockSessionTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionTokenRepository for MockSessionTokenRepository {
    async fn save_token(&self, record: SessionTokenRecord) -> Result<(), AuthError> {
        let mut records = self.records.lock().unwrap();
        records.push(record);
        Ok(())
    }

    async fn find_token(&self, token: &str) -> Result<Option<SessionTokenRecord>, AuthError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.token == token).cloned())
    }

    async fn invalidate_token(&self, token: &str) -> Result<(), AuthError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.token == token) {
            record.is_valid = false;
        }
        Ok(())
    }

    async fn invalidate_all_user_tokens(&self, user_id: &str) -> Result<u64, AuthError> {
        let mut records = self.records.lock().unwrap();
        let mut flipped = 0;
        for record in records.iter_mut() {
            if record.user_id == user_id && record.is_valid {
                record.is_valid = false;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}
