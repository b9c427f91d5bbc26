//! The request-filter boundary for actix-web.
//!
//! No routes or controllers live here; the crate only provides the
//! per-request extractor that turns a bearer token into a validated
//! [`SessionIdentity`](crate::SessionIdentity), and the fingerprint
//! derivation it shares with issuance.

mod middleware;
mod types;

pub use middleware::{fingerprint_from_request, AuthenticatedUser, AuthenticationError};
pub use types::ErrorResponse;
