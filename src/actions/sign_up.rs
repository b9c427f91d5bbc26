use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::crypto::{generate_token_default, Argon2Hasher, PasswordHasher};
use crate::events::{dispatch, AuthEvent};
use crate::mail::Mailer;
use crate::repository::{User, UserRepository, VerificationToken, VerificationTokenRepository};
use crate::AuthError;

/// How long a mailed activation link stays usable.
const VERIFICATION_TOKEN_VALIDITY_HOURS: i64 = 24;

/// Registers a new account.
///
/// The account starts disabled with the default role; a verification token
/// is created and mailed out, and the user activates the account through
/// [`ActivateAccountAction`](crate::actions::ActivateAccountAction). The
/// mail send is fire-and-forget: a failing mail backend never fails
/// sign-up.
pub struct SignUpAction<U, V, M> {
    user_repository: U,
    verification_repository: V,
    mailer: Arc<M>,
    hasher: Box<dyn PasswordHasher>,
}

impl<U, V, M> SignUpAction<U, V, M>
where
    U: UserRepository,
    V: VerificationTokenRepository,
    M: Mailer,
{
    pub fn new(user_repository: U, verification_repository: V, mailer: M) -> Self {
        Self {
            user_repository,
            verification_repository,
            mailer: Arc::new(mailer),
            hasher: Box::new(Argon2Hasher::default()),
        }
    }

    /// Replaces the default argon2 hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: impl PasswordHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    /// Executes the sign-up, returning the created (not yet enabled) user.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "sign_up", skip_all, err)
    )]
    pub async fn execute(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username_taken = self.user_repository.exists_by_username(username).await?;
        let email_taken = self.user_repository.exists_by_email(email).await?;

        if username_taken || email_taken {
            // logs say which collided; the caller-facing error never does
            if username_taken {
                log::debug!(
                    target: "palisade_auth",
                    "msg=\"sign up rejected, username taken\", username=\"{username}\""
                );
            }
            if email_taken {
                log::debug!(
                    target: "palisade_auth",
                    "msg=\"sign up rejected, email taken\", email=\"{email}\""
                );
            }
            return Err(AuthError::UserAlreadyExists);
        }

        let hashed = self.hasher.hash(password)?;
        let user = self
            .user_repository
            .create_user(User::new(username, email, hashed))
            .await?;

        let verification_token = self
            .verification_repository
            .create_verification_token(VerificationToken {
                token: generate_token_default(),
                user_id: user.id.clone(),
                expires_at: Utc::now() + Duration::hours(VERIFICATION_TOKEN_VALIDITY_HOURS),
            })
            .await?;

        // fire-and-forget: sign-up has already succeeded at this point
        let mailer = Arc::clone(&self.mailer);
        let mail_user = user.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer
                .send_verification_email(&mail_user, &verification_token)
                .await
            {
                log::warn!(
                    target: "palisade_mail",
                    "msg=\"verification email failed\", user_id=\"{}\", error=\"{e}\"",
                    mail_user.id
                );
            }
        });

        dispatch(AuthEvent::UserRegistered {
            user_id: user.id.clone(),
            email: user.email.clone(),
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "palisade_auth",
            "msg=\"user signed up\", user_id=\"{}\"",
            user.id
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::MockMailer;
    use crate::{MockUserRepository, MockVerificationTokenRepository};

    fn action(
        mailer: MockMailer,
    ) -> SignUpAction<MockUserRepository, MockVerificationTokenRepository, MockMailer> {
        SignUpAction::new(
            MockUserRepository::new(),
            MockVerificationTokenRepository::new(),
            mailer,
        )
    }

    #[tokio::test]
    async fn test_sign_up_creates_disabled_user_with_verification_token() {
        let action = action(MockMailer::new());

        let user = action
            .execute("alice", "alice@example.com", "securepassword")
            .await
            .unwrap();

        assert!(!user.enabled);
        assert_eq!(user.username, "alice");

        let tokens = action.verification_repository.tokens.lock().unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].user_id, user.id);
        assert!(tokens[0].expires_at > Utc::now());
    }

    #[tokio::test]
    async fn test_sign_up_stores_a_hash_not_the_password() {
        let action = action(MockMailer::new());

        let user = action
            .execute("alice", "alice@example.com", "securepassword")
            .await
            .unwrap();

        assert_ne!(user.hashed_password, "securepassword");
        assert!(Argon2Hasher::default()
            .verify("securepassword", &user.hashed_password)
            .unwrap());
    }

    #[tokio::test]
    async fn test_sign_up_rejects_taken_username() {
        let action = action(MockMailer::new());
        action
            .execute("alice", "alice@example.com", "pw-one-long-enough")
            .await
            .unwrap();

        let result = action
            .execute("alice", "other@example.com", "pw-two-long-enough")
            .await;
        assert_eq!(result.unwrap_err(), AuthError::UserAlreadyExists);
    }

    #[tokio::test]
    async fn test_sign_up_rejects_taken_email() {
        let action = action(MockMailer::new());
        action
            .execute("alice", "alice@example.com", "pw-one-long-enough")
            .await
            .unwrap();

        let result = action
            .execute("bob", "alice@example.com", "pw-two-long-enough")
            .await;
        assert_eq!(result.unwrap_err(), AuthError::UserAlreadyExists);
    }

    #[tokio::test]
    async fn test_sign_up_sends_verification_mail() {
        let mailer = MockMailer::new();
        let action = action(mailer.clone());

        action
            .execute("alice", "alice@example.com", "securepassword")
            .await
            .unwrap();

        // the send is spawned; give it a chance to run
        tokio::task::yield_now().await;

        let sent = mailer.sent_mail();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "alice@example.com");
    }

    #[tokio::test]
    async fn test_mail_failure_does_not_fail_sign_up() {
        let action = action(MockMailer::failing());

        let result = action
            .execute("alice", "alice@example.com", "securepassword")
            .await;
        assert!(result.is_ok());
    }
}
