use chrono::Utc;

use crate::events::{dispatch, AuthEvent};
use crate::repository::{UserRepository, VerificationTokenRepository};
use crate::AuthError;

/// Activates an account with the opaque token mailed at sign-up.
///
/// Activation enables the user and consumes the token. An unknown token is
/// invalid; an expired one fails without being consumed.
pub struct ActivateAccountAction<U, V> {
    user_repository: U,
    verification_repository: V,
}

impl<U, V> ActivateAccountAction<U, V>
where
    U: UserRepository,
    V: VerificationTokenRepository,
{
    pub fn new(user_repository: U, verification_repository: V) -> Self {
        Self {
            user_repository,
            verification_repository,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "activate_account", skip_all, err)
    )]
    pub async fn execute(&self, token: &str) -> Result<(), AuthError> {
        let verification_token = self
            .verification_repository
            .find_verification_token(token)
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        if verification_token.is_expired(Utc::now()) {
            return Err(AuthError::TokenExpired);
        }

        self.user_repository
            .enable_user(&verification_token.user_id)
            .await?;
        self.verification_repository
            .delete_verification_token(token)
            .await?;

        dispatch(AuthEvent::AccountActivated {
            user_id: verification_token.user_id.clone(),
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "palisade_auth",
            "msg=\"account activated\", user_id=\"{}\"",
            verification_token.user_id
        );

        Ok(())
    }
}
