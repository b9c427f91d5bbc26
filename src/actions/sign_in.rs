use chrono::Utc;

use crate::crypto::{Argon2Hasher, PasswordHasher};
use crate::events::{dispatch, AuthEvent};
use crate::repository::{SessionTokenRepository, User, UserRepository};
use crate::session::{Fingerprint, SessionPrincipal, SessionService};
use crate::AuthError;

/// Response from a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignInResponse {
    /// The authenticated user.
    pub user: User,
    /// The issued session token.
    pub token: String,
    /// Token expiration timestamp (Unix seconds).
    pub expires_at: i64,
}

/// The authentication entry point: verifies credentials and issues a
/// fingerprint-bound session.
///
/// Unknown identifier and wrong password are indistinguishable to the
/// caller; both come back as `InvalidCredentials`. Logs keep the
/// distinction.
pub struct SignInAction<S, U> {
    user_repository: U,
    sessions: SessionService<S, U>,
    hasher: Box<dyn PasswordHasher>,
}

impl<S, U> SignInAction<S, U>
where
    S: SessionTokenRepository,
    U: UserRepository,
{
    pub fn new(user_repository: U, sessions: SessionService<S, U>) -> Self {
        Self {
            user_repository,
            sessions,
            hasher: Box::new(Argon2Hasher::default()),
        }
    }

    /// Replaces the default argon2 hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: impl PasswordHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    /// Verifies the credentials and issues a session token.
    ///
    /// `identifier` is the username or the email address. The request
    /// fingerprint is fixed into the token and re-checked on every later
    /// validation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "sign_in", skip_all, err)
    )]
    pub async fn execute(
        &self,
        identifier: &str,
        password: &str,
        fingerprint: &Fingerprint,
    ) -> Result<SignInResponse, AuthError> {
        let user = match self
            .user_repository
            .find_user_by_username_or_email(identifier)
            .await?
        {
            Some(user) => user,
            None => {
                log::debug!(
                    target: "palisade_auth",
                    "msg=\"sign in failed, unknown identifier\", identifier=\"{identifier}\""
                );
                self.sign_in_failed(identifier, "unknown username or email")
                    .await;
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &user.hashed_password)? {
            log::debug!(
                target: "palisade_auth",
                "msg=\"sign in failed, wrong password\", user_id=\"{}\"",
                user.id
            );
            self.sign_in_failed(identifier, "wrong password").await;
            return Err(AuthError::InvalidCredentials);
        }

        if !user.enabled {
            log::debug!(
                target: "palisade_auth",
                "msg=\"sign in failed, account not activated\", user_id=\"{}\"",
                user.id
            );
            self.sign_in_failed(identifier, "account not activated")
                .await;
            return Err(AuthError::AccountDisabled);
        }

        let token = self
            .sessions
            .issue(&SessionPrincipal::from(&user), fingerprint)
            .await?;
        let expires_at = self.sessions.claims(&token)?.exp;

        dispatch(AuthEvent::SignInSuccess {
            user_id: user.id.clone(),
            at: Utc::now(),
        })
        .await;

        Ok(SignInResponse {
            user,
            token,
            expires_at,
        })
    }

    async fn sign_in_failed(&self, identifier: &str, reason: &str) {
        dispatch(AuthEvent::SignInFailed {
            identifier: identifier.to_owned(),
            reason: reason.to_owned(),
            at: Utc::now(),
        })
        .await;
    }
}
