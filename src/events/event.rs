use chrono::{DateTime, Utc};

/// Authentication events emitted by palisade actions.
///
/// Events are always fired from actions. If no listeners are registered,
/// they are silently ignored (no-op). Register listeners via
/// [`register_event_listeners`](crate::register_event_listeners) to handle events.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    // user lifecycle
    UserRegistered {
        user_id: String,
        email: String,
        at: DateTime<Utc>,
    },
    AccountActivated {
        user_id: String,
        at: DateTime<Utc>,
    },

    // sessions
    SignInSuccess {
        user_id: String,
        at: DateTime<Utc>,
    },
    SignInFailed {
        identifier: String,
        reason: String,
        at: DateTime<Utc>,
    },
    SignOutSuccess {
        user_id: String,
        at: DateTime<Utc>,
    },
    AllSessionsRevoked {
        user_id: String,
        count: u64,
        at: DateTime<Utc>,
    },
}

impl AuthEvent {
    /// Returns a dot-separated event name for logging/tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } => "user.registered",
            Self::AccountActivated { .. } => "user.activated",
            Self::SignInSuccess { .. } => "auth.sign_in.success",
            Self::SignInFailed { .. } => "auth.sign_in.failed",
            Self::SignOutSuccess { .. } => "auth.sign_out.success",
            Self::AllSessionsRevoked { .. } => "auth.sessions.all_revoked",
        }
    }

    /// Returns the timestamp when this event occurred.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::UserRegistered { at, .. }
            | Self::AccountActivated { at, .. }
            | Self::SignInSuccess { at, .. }
            | Self::SignInFailed { at, .. }
            | Self::SignOutSuccess { at, .. }
            | Self::AllSessionsRevoked { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let now = Utc::now();

        assert_eq!(
            AuthEvent::UserRegistered {
                user_id: "u1".to_owned(),
                email: "test@example.com".to_owned(),
                at: now
            }
            .name(),
            "user.registered"
        );

        assert_eq!(
            AuthEvent::AccountActivated {
                user_id: "u1".to_owned(),
                at: now
            }
            .name(),
            "user.activated"
        );

        assert_eq!(
            AuthEvent::SignInSuccess {
                user_id: "u1".to_owned(),
                at: now
            }
            .name(),
            "auth.sign_in.success"
        );

        assert_eq!(
            AuthEvent::SignInFailed {
                identifier: "test@example.com".to_owned(),
                reason: "wrong password".to_owned(),
                at: now
            }
            .name(),
            "auth.sign_in.failed"
        );

        assert_eq!(
            AuthEvent::SignOutSuccess {
                user_id: "u1".to_owned(),
                at: now
            }
            .name(),
            "auth.sign_out.success"
        );

        assert_eq!(
            AuthEvent::AllSessionsRevoked {
                user_id: "u1".to_owned(),
                count: 3,
                at: now
            }
            .name(),
            "auth.sessions.all_revoked"
        );
    }

    #[test]
    fn test_event_timestamp() {
        let now = Utc::now();

        let event = AuthEvent::SignInSuccess {
            user_id: "u1".to_owned(),
            at: now,
        };

        assert_eq!(event.timestamp(), now);
    }

    #[test]
    fn test_event_clone() {
        let now = Utc::now();
        let event = AuthEvent::UserRegistered {
            user_id: "u1".to_owned(),
            email: "test@example.com".to_owned(),
            at: now,
        };

        let cloned = event.clone();
        assert_eq!(event.name(), cloned.name());
        assert_eq!(event.timestamp(), cloned.timestamp());
    }
}
