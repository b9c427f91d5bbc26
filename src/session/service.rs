use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::{Fingerprint, SessionClaims, SessionConfig, TokenCodec, BEARER_PREFIX};
use crate::repository::{SessionTokenRecord, SessionTokenRepository, UserRepository};
use crate::{AuthError, User};

/// An authenticated principal a session is issued to: id plus the
/// authority set snapshot that goes into the token.
#[derive(Debug, Clone)]
pub struct SessionPrincipal {
    pub id: String,
    pub authorities: HashSet<String>,
}

impl From<&User> for SessionPrincipal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            authorities: user.roles.clone(),
        }
    }
}

/// The per-request identity derived from a validated token.
///
/// Reconstructed from claims on every validation; never persisted and never
/// stored in any process-global. Callers thread it through explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: String,
    pub authorities: HashSet<String>,
}

impl SessionIdentity {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}

/// Returns the bearer token carried in an `Authorization` header value.
///
/// `None` means "no token present" and is not an error: a request without
/// one proceeds as anonymous. The header must start with `"Bearer "`; the
/// remainder is returned verbatim, with no decoding at this stage.
pub fn bearer_token(header_value: Option<&str>) -> Option<&str> {
    header_value.and_then(|value| value.strip_prefix(BEARER_PREFIX))
}

/// Issues, validates and revokes fingerprint-bound session tokens.
///
/// The token store is the single point of coordination: a token whose
/// record is missing or flagged invalid never validates, regardless of its
/// signature.
#[derive(Clone)]
pub struct SessionService<S, U> {
    pub(crate) tokens: S,
    pub(crate) users: U,
    codec: TokenCodec,
    config: SessionConfig,
}

impl<S, U> SessionService<S, U>
where
    S: SessionTokenRepository,
    U: UserRepository,
{
    pub fn new(tokens: S, users: U, config: SessionConfig) -> Self {
        let codec = TokenCodec::new(&config);

        Self {
            tokens,
            users,
            codec,
            config,
        }
    }

    /// Issues a new session token for an already-authenticated principal.
    ///
    /// Builds claims from the principal and the request fingerprint, signs
    /// them, and persists one new valid [`SessionTokenRecord`]. Issuance
    /// never touches existing records; concurrent sessions for one owner
    /// are independent until individually revoked.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "session_issue", skip_all, err)
    )]
    pub async fn issue(
        &self,
        principal: &SessionPrincipal,
        fingerprint: &Fingerprint,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = now + self.config.validity;

        let claims = SessionClaims {
            sub: principal.id.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            ip: fingerprint.ip.clone(),
            ua: fingerprint.user_agent.clone(),
            authorities: principal.authorities.clone(),
        };

        let token = self.codec.encode(&claims)?;

        // The stored expiry mirrors the claim, which only has second
        // precision.
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::TokenInvalid)?;

        self.tokens
            .save_token(SessionTokenRecord::new(
                token.clone(),
                principal.id.clone(),
                expires_at,
            ))
            .await?;

        log::info!(
            target: "palisade_auth",
            "msg=\"session issued\", user_id=\"{}\"",
            principal.id
        );

        Ok(token)
    }

    /// Validates a presented token against the current request fingerprint.
    ///
    /// Checks run in order and the first failure short-circuits:
    /// signature + expiry, revocation record, owner existence, IP claim,
    /// user-agent claim. Cheap cryptographic rejection comes before store
    /// round-trips; the fingerprint checks are advisory hardening against
    /// token theft and run last.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "session_validate", skip_all, err)
    )]
    pub async fn validate(
        &self,
        token: &str,
        fingerprint: &Fingerprint,
    ) -> Result<SessionIdentity, AuthError> {
        let claims = self.codec.decode(token)?;

        match self.tokens.find_token(token).await? {
            Some(record) if record.is_valid => {}
            _ => {
                log::warn!(
                    target: "palisade_auth",
                    "msg=\"revoked or unknown token presented\", user_id=\"{}\"",
                    claims.sub
                );
                return Err(AuthError::TokenRevoked);
            }
        }

        if !self.users.exists_by_user_id(&claims.sub).await? {
            log::warn!(
                target: "palisade_auth",
                "msg=\"token subject no longer exists\", user_id=\"{}\"",
                claims.sub
            );
            return Err(AuthError::UserNotFound);
        }

        if fingerprint.ip != claims.ip {
            log::warn!(
                target: "palisade_auth",
                "msg=\"ip mismatch\", user_id=\"{}\", expected=\"{}\", got=\"{}\"",
                claims.sub, claims.ip, fingerprint.ip
            );
            return Err(AuthError::FingerprintMismatch);
        }

        if fingerprint.user_agent != claims.ua {
            log::warn!(
                target: "palisade_auth",
                "msg=\"user agent mismatch\", user_id=\"{}\"",
                claims.sub
            );
            return Err(AuthError::FingerprintMismatch);
        }

        Ok(SessionIdentity {
            user_id: claims.sub,
            authorities: claims.authorities,
        })
    }

    /// Decodes a token's claims without consulting the store.
    ///
    /// Signature and expiry are still enforced; revocation and fingerprint
    /// are not. Used where only the claims are needed, such as resolving
    /// the owner during sign-out.
    pub fn claims(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.codec.decode(token)
    }

    /// Revokes a single session token.
    ///
    /// Flips the record's validity flag; the transition is one-way. A token
    /// with no record is a success no-op.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "session_revoke", skip_all, err)
    )]
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        self.tokens.invalidate_token(token).await?;

        log::info!(target: "palisade_auth", "msg=\"session revoked\"");

        Ok(())
    }

    /// Revokes every currently-valid session of one owner.
    ///
    /// A single conditional update at the store; records that are already
    /// invalid are untouched, and other owners are unaffected. Returns the
    /// number of sessions revoked.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "session_revoke_all", skip_all, err)
    )]
    pub async fn revoke_all_for_user(&self, user_id: &str) -> Result<u64, AuthError> {
        let revoked = self.tokens.invalidate_all_user_tokens(user_id).await?;

        log::info!(
            target: "palisade_auth",
            "msg=\"all sessions revoked\", user_id=\"{user_id}\", count={revoked}"
        );

        Ok(revoked)
    }
}
