use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Role granted to every freshly registered user.
pub const DEFAULT_ROLE: &str = "USER";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    /// False until the account is activated via its verification token.
    pub enabled: bool,
    pub roles: HashSet<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new, not-yet-activated user with the default role and a
    /// fresh UUID id.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        hashed_password: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            hashed_password: hashed_password.into(),
            enabled: false,
            roles: HashSet::from([DEFAULT_ROLE.to_owned()]),
            created_at: Utc::now(),
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
impl User {
    /// An enabled user with the default role and a fixed password hash.
    pub fn mock(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            username: format!("user-{id}"),
            email: format!("{id}@example.com"),
            hashed_password: "fakehashedpassword".to_owned(),
            enabled: true,
            roles: HashSet::from([DEFAULT_ROLE.to_owned()]),
            created_at: Utc::now(),
        }
    }

    pub fn mock_with_credentials(username: &str, email: &str, hashed_password: &str) -> Self {
        let mut user = User::new(username, email, hashed_password);
        user.enabled = true;
        user
    }
}

/// The credential store: user identity, password hash, activation state
/// and roles.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AuthError>;

    /// Sign-in accepts either the username or the email address.
    async fn find_user_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, AuthError>;

    async fn exists_by_user_id(&self, id: &str) -> Result<bool, AuthError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, AuthError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, AuthError>;

    async fn create_user(&self, user: User) -> Result<User, AuthError>;

    /// Flips the account to enabled after verification.
    async fn enable_user(&self, user_id: &str) -> Result<(), AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_starts_disabled_with_default_role() {
        let user = User::new("alice", "alice@example.com", "hash");

        assert!(!user.enabled);
        assert_eq!(user.roles, HashSet::from([DEFAULT_ROLE.to_owned()]));
        assert!(!user.id.is_empty());
    }

    #[test]
    fn test_new_users_get_unique_ids() {
        let a = User::new("alice", "alice@example.com", "hash");
        let b = User::new("bob", "bob@example.com", "hash");
        assert_ne!(a.id, b.id);
    }
}
