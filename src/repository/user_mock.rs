use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{User, UserRepository};
use crate::AuthError;

/// In-memory credential store for tests. Clones share the same users.
#[derive(Clone, Debug)]
pub struct MockUserRepository {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(vec![])),
        }
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.username == identifier || u.email == identifier)
            .cloned())
    }

    async fn exists_by_user_id(&self, id: &str) -> Result<bool, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|u| u.id == id))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|u| u.email == email))
    }

    async fn create_user(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();
        users.push(user.clone());
        drop(users);

        Ok(user)
    }

    async fn enable_user(&self, user_id: &str) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.enabled = true;
            Ok(())
        } else {
            Err(AuthError::UserNotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_by_username_or_email() {
        let repo = MockUserRepository::new();
        repo.create_user(User::mock_with_credentials(
            "alice",
            "alice@example.com",
            "hash",
        ))
        .await
        .unwrap();

        assert!(repo
            .find_user_by_username_or_email("alice")
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .find_user_by_username_or_email("alice@example.com")
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .find_user_by_username_or_email("bob")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_enable_user() {
        let repo = MockUserRepository::new();
        let user = repo
            .create_user(User::new("alice", "alice@example.com", "hash"))
            .await
            .unwrap();
        assert!(!user.enabled);

        repo.enable_user(&user.id).await.unwrap();
        assert!(repo.find_user_by_id(&user.id).await.unwrap().unwrap().enabled);

        let result = repo.enable_user("missing").await;
        assert_eq!(result, Err(AuthError::UserNotFound));
    }
}
