use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Claims embedded in a session token.
///
/// This is a fixed, structured record: every field is required, and a token
/// missing any of them fails decoding as an invalid token. The fingerprint
/// claims (`ip`, `ua`) and the authority set are fixed at issuance; they are
/// never re-derived from current state during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - the owner's user id.
    pub sub: String,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// IP address of the request the token was issued to.
    pub ip: String,
    /// User agent of the request the token was issued to.
    pub ua: String,
    /// Authority strings held by the owner at issuance.
    pub authorities: HashSet<String>,
}

impl SessionClaims {
    /// Returns true if the claims carry the given authority.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorities_deduplicate() {
        let claims: SessionClaims = serde_json::from_str(
            r#"{"sub":"u1","iat":0,"exp":1,"ip":"1.2.3.4","ua":"A",
                "authorities":["USER","ADMIN","USER"]}"#,
        )
        .unwrap();

        assert_eq!(claims.authorities.len(), 2);
        assert!(claims.has_authority("USER"));
        assert!(claims.has_authority("ADMIN"));
        assert!(!claims.has_authority("ROOT"));
    }

    #[test]
    fn test_missing_claim_fails_deserialization() {
        // no fingerprint claims
        let result = serde_json::from_str::<SessionClaims>(
            r#"{"sub":"u1","iat":0,"exp":1,"authorities":["USER"]}"#,
        );
        assert!(result.is_err());
    }
}
