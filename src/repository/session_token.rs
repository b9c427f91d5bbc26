use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Persisted metadata for one issued session token.
///
/// The token string itself is the primary key. Records are created at
/// sign-in, mutated only by revocation, and kept around afterwards; an
/// expired or invalidated record is audit history, not garbage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokenRecord {
    /// The encoded token, verbatim.
    pub token: String,
    /// Owner of the session; one owner may hold many records.
    pub user_id: String,
    /// Absolute expiry, mirroring the token's `exp` claim.
    pub expires_at: DateTime<Utc>,
    /// `true` from issuance until revocation flips it, exactly once.
    pub is_valid: bool,
}

impl SessionTokenRecord {
    pub fn new(token: String, user_id: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id,
            expires_at,
            is_valid: true,
        }
    }

    /// True when the record's expiry is before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Store of issued-token records; the authority on revocation.
#[async_trait]
pub trait SessionTokenRepository: Send + Sync {
    /// Persists a newly issued record.
    async fn save_token(&self, record: SessionTokenRecord) -> Result<(), AuthError>;

    /// Looks up a record by its token string.
    async fn find_token(&self, token: &str) -> Result<Option<SessionTokenRecord>, AuthError>;

    /// Marks one record invalid. Missing records are a success no-op.
    async fn invalidate_token(&self, token: &str) -> Result<(), AuthError>;

    /// Marks every currently-valid record of one owner invalid, as a single
    /// conditional update. Returns how many records were flipped.
    async fn invalidate_all_user_tokens(&self, user_id: &str) -> Result<u64, AuthError>;
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_new_record_is_valid() {
        let record = SessionTokenRecord::new(
            "token".to_owned(),
            "u1".to_owned(),
            Utc::now() + Duration::days(1),
        );
        assert!(record.is_valid);
    }

    #[test]
    fn test_is_expired_is_strictly_before_now() {
        let now = Utc::now();
        let expired = SessionTokenRecord::new("t".to_owned(), "u1".to_owned(), now - Duration::seconds(1));
        let live = SessionTokenRecord::new("t".to_owned(), "u1".to_owned(), now + Duration::seconds(1));

        assert!(expired.is_expired(now));
        assert!(!live.is_expired(now));
    }
}
