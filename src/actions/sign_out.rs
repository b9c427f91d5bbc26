use chrono::Utc;

use crate::events::{dispatch, AuthEvent};
use crate::repository::{SessionTokenRepository, UserRepository};
use crate::session::SessionService;
use crate::AuthError;

/// Ends the presented session, or every session of its owner.
///
/// The owner is read from the token's own claims; the flag selects between
/// revoking the one token and revoking all of the owner's tokens ("sign
/// out everywhere"). Both forms are idempotent.
pub struct SignOutAction<S, U> {
    sessions: SessionService<S, U>,
}

impl<S, U> SignOutAction<S, U>
where
    S: SessionTokenRepository,
    U: UserRepository,
{
    pub fn new(sessions: SessionService<S, U>) -> Self {
        Self { sessions }
    }

    /// Revokes the session(s) selected by `on_all_devices`.
    ///
    /// The token must still decode; a request filter has normally already
    /// validated it. Revoking a token whose record is gone is a no-op.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "sign_out", skip_all, err)
    )]
    pub async fn execute(&self, token: &str, on_all_devices: bool) -> Result<(), AuthError> {
        let user_id = self.sessions.claims(token)?.sub;

        if on_all_devices {
            let count = self.sessions.revoke_all_for_user(&user_id).await?;

            dispatch(AuthEvent::AllSessionsRevoked {
                user_id,
                count,
                at: Utc::now(),
            })
            .await;
        } else {
            self.sessions.revoke(token).await?;

            dispatch(AuthEvent::SignOutSuccess {
                user_id,
                at: Utc::now(),
            })
            .await;
        }

        Ok(())
    }
}
