use serde::{Deserialize, Serialize};

/// The client fingerprint a session is bound to.
///
/// Captured once at issuance and compared against the fingerprint of every
/// request presenting the token. Components are plain strings; whatever is
/// unavailable defaults to `""`, never an absent value, so comparisons stay
/// total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub ip: String,
    pub user_agent: String,
}

impl Fingerprint {
    pub fn new(ip: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Builds a fingerprint from raw request parts.
    ///
    /// IP policy, shared by issuance and validation: a non-empty
    /// forwarded-for header wins, otherwise the connection's remote
    /// address. The same request shape always yields the same fingerprint;
    /// tokens would otherwise spuriously mismatch their own issuer.
    pub fn from_parts(
        forwarded_for: Option<&str>,
        remote_addr: Option<&str>,
        user_agent: Option<&str>,
    ) -> Self {
        let ip = match forwarded_for {
            Some(forwarded) if !forwarded.is_empty() => forwarded,
            _ => remote_addr.unwrap_or(""),
        };

        Self {
            ip: ip.to_owned(),
            user_agent: user_agent.unwrap_or("").to_owned(),
        }
    }
}
