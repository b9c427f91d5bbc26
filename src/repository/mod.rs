//! Repository traits and the models they persist.
//!
//! Implementations live behind feature flags (see [`crate::postgres`]);
//! mock implementations backed by in-memory vectors are compiled for tests
//! and with the `mocks` feature.

mod session_token;
mod user;
mod verification;

pub use session_token::{SessionTokenRecord, SessionTokenRepository};
pub use user::{User, UserRepository, DEFAULT_ROLE};
pub use verification::{VerificationToken, VerificationTokenRepository};

#[cfg(any(test, feature = "mocks"))]
mod session_token_mock;
#[cfg(any(test, feature = "mocks"))]
mod user_mock;
#[cfg(any(test, feature = "mocks"))]
mod verification_mock;

#[cfg(any(test, feature = "mocks"))]
pub use session_token_mock::MockSessionTokenRepository;
#[cfg(any(test, feature = "mocks"))]
pub use user_mock::MockUserRepository;
#[cfg(any(test, feature = "mocks"))]
pub use verification_mock::MockVerificationTokenRepository;
