//! Outbound mail boundary.
//!
//! Delivery itself is an external collaborator; this module only defines
//! the contract the auth actions call. Dispatch is fire-and-forget: the
//! caller spawns the send and never awaits it, so a failing mail backend
//! cannot fail sign-up.

use async_trait::async_trait;

use crate::repository::{User, VerificationToken};
use crate::AuthError;

/// Sends account-related mail.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Sends the account-activation link for a freshly registered user.
    async fn send_verification_email(
        &self,
        user: &User,
        token: &VerificationToken,
    ) -> Result<(), AuthError>;
}

/// Discards all mail. Useful for environments without a mail backend.
#[derive(Debug, Clone, Default)]
pub struct NullMailer;

#[async_trait]
impl Mailer for NullMailer {
    async fn send_verification_email(
        &self,
        user: &User,
        _token: &VerificationToken,
    ) -> Result<(), AuthError> {
        log::debug!(
            target: "palisade_mail",
            "msg=\"discarding verification email\", user_id=\"{}\"",
            user.id
        );
        Ok(())
    }
}

#[cfg(any(test, feature = "mocks"))]
mod mock {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records sent mail in memory for tests.
    ///
    /// Clones share the same inbox, so a copy handed to an action observes
    /// the sends triggered by it.
    #[derive(Clone, Default)]
    pub struct MockMailer {
        pub sent: Arc<Mutex<Vec<(String, String)>>>,
        pub fail: bool,
    }

    impl MockMailer {
        pub fn new() -> Self {
            Self::default()
        }

        /// A mailer whose every send fails.
        pub fn failing() -> Self {
            Self {
                sent: Arc::new(Mutex::new(vec![])),
                fail: true,
            }
        }

        /// The (email, token) pairs sent so far.
        pub fn sent_mail(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for MockMailer {
        async fn send_verification_email(
            &self,
            user: &User,
            token: &VerificationToken,
        ) -> Result<(), AuthError> {
            if self.fail {
                return Err(AuthError::DatabaseError("mail backend down".to_owned()));
            }

            let mut sent = self.sent.lock().unwrap();
            sent.push((user.email.clone(), token.token.clone()));
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
pub use mock::MockMailer;
