//! Fingerprint-bound JWT sessions with server-side revocation.
//!
//! A session token is a signed JWT carrying the owner id, an authority
//! snapshot and the client fingerprint (IP + user agent) captured at
//! issuance. Every issued token is also persisted as a
//! [`SessionTokenRecord`](crate::SessionTokenRecord); the store, not the
//! signature, is the authority for revocation. Validation runs a fixed
//! pipeline: signature/expiry, revocation lookup, owner existence,
//! fingerprint match.
//!
//! # Example
//!
//! ```ignore
//! use palisade::session::{Fingerprint, SessionConfig, SessionService};
//!
//! let config = SessionConfig::new("a-shared-secret-of-at-least-32-bytes")?
//!     .with_validity(chrono::Duration::hours(12));
//! let sessions = SessionService::new(token_repo, user_repo, config);
//! ```

mod claims;
mod codec;
mod config;
mod fingerprint;
mod service;

pub use claims::SessionClaims;
pub use codec::TokenCodec;
pub use config::{SessionConfig, AUTHORIZATION_HEADER, BEARER_PREFIX, MIN_SECRET_LENGTH};
pub use fingerprint::Fingerprint;
pub use service::{bearer_token, SessionIdentity, SessionPrincipal, SessionService};
