use std::future::Future;
use std::pin::Pin;

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest, HttpResponse};

use crate::repository::{SessionTokenRepository, UserRepository};
use crate::session::{bearer_token, Fingerprint, SessionIdentity, SessionService};
use crate::AuthError;

use super::ErrorResponse;

/// Authenticated session extractor.
///
/// Use this in handler parameters to require a valid session. The
/// extractor pulls the bearer token from the `Authorization` header,
/// derives the request fingerprint and delegates to
/// [`SessionService::validate`]; the handler receives the per-request
/// [`SessionIdentity`]. A request without a token is anonymous, which for
/// a handler requiring this extractor means rejection.
///
/// # Example
/// ```ignore
/// async fn protected_handler(
///     session: AuthenticatedUser<MyTokenRepo, MyUserRepo>,
/// ) -> impl Responder {
///     format!("Hello, {}!", session.identity().user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser<S, U>
where
    S: SessionTokenRepository,
    U: UserRepository,
{
    identity: SessionIdentity,
    _marker: std::marker::PhantomData<(S, U)>,
}

impl<S, U> AuthenticatedUser<S, U>
where
    S: SessionTokenRepository,
    U: UserRepository,
{
    /// Returns the inner identity, consuming the wrapper.
    pub fn into_inner(self) -> SessionIdentity {
        self.identity
    }

    /// Returns a reference to the validated session identity.
    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError {
    pub error: AuthError,
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn error_response(&self) -> HttpResponse {
        let body = ErrorResponse::from(&self.error);

        if self.error.is_unauthorized() {
            // the audit trail knows which check failed; the client does not
            log::warn!(
                target: "palisade_auth",
                "msg=\"request rejected\", kind=\"{:?}\"",
                self.error
            );
            HttpResponse::Unauthorized().json(body)
        } else {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// Derives the request fingerprint, with the same IP policy as issuance:
/// a non-empty `X-Forwarded-For` wins, otherwise the peer address.
pub fn fingerprint_from_request(req: &HttpRequest) -> Fingerprint {
    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok());
    let peer = req.peer_addr().map(|addr| addr.ip().to_string());
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());

    Fingerprint::from_parts(forwarded, peer.as_deref(), user_agent)
}

impl<S, U> FromRequest for AuthenticatedUser<S, U>
where
    S: SessionTokenRepository + 'static,
    U: UserRepository + 'static,
{
    type Error = AuthenticationError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| bearer_token(Some(value)))
            .map(ToOwned::to_owned);

        let fingerprint = fingerprint_from_request(req);

        let sessions = req
            .app_data::<web::Data<SessionService<S, U>>>()
            .cloned();

        Box::pin(async move {
            let token = token.ok_or(AuthenticationError {
                error: AuthError::TokenInvalid,
            })?;

            let sessions = sessions.ok_or(AuthenticationError {
                error: AuthError::ConfigurationError(
                    "SessionService missing from app data".to_owned(),
                ),
            })?;

            let identity = sessions
                .validate(&token, &fingerprint)
                .await
                .map_err(|error| AuthenticationError { error })?;

            Ok(AuthenticatedUser {
                identity,
                _marker: std::marker::PhantomData,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use actix_web::test as actix_test;
    use actix_web::ResponseError;

    use super::*;
    use crate::session::{SessionConfig, SessionPrincipal};
    use crate::{MockSessionTokenRepository, MockUserRepository, User};

    type TestAuth = AuthenticatedUser<MockSessionTokenRepository, MockUserRepository>;

    fn sessions() -> SessionService<MockSessionTokenRepository, MockUserRepository> {
        let users = MockUserRepository::new();
        users.users.lock().unwrap().push(User::mock("u1"));

        let config = SessionConfig::new("test-secret-32-bytes-long-key-01").unwrap();
        SessionService::new(MockSessionTokenRepository::new(), users, config)
    }

    async fn issue(
        sessions: &SessionService<MockSessionTokenRepository, MockUserRepository>,
    ) -> String {
        let principal = SessionPrincipal {
            id: "u1".to_owned(),
            authorities: HashSet::from(["USER".to_owned()]),
        };
        sessions
            .issue(&principal, &Fingerprint::new("1.2.3.4", "A"))
            .await
            .unwrap()
    }

    #[actix_rt::test]
    async fn test_valid_token_with_matching_fingerprint_extracts_identity() {
        let sessions = sessions();
        let token = issue(&sessions).await;

        let req = actix_test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .insert_header(("X-Forwarded-For", "1.2.3.4"))
            .insert_header((header::USER_AGENT, "A"))
            .app_data(web::Data::new(sessions))
            .to_http_request();

        let auth = TestAuth::extract(&req).await.unwrap();
        assert_eq!(auth.identity().user_id, "u1");
        assert!(auth.identity().has_authority("USER"));
    }

    #[actix_rt::test]
    async fn test_missing_header_is_rejected() {
        let req = actix_test::TestRequest::default()
            .app_data(web::Data::new(sessions()))
            .to_http_request();

        let result = TestAuth::extract(&req).await;
        assert!(result.is_err());
    }

    #[actix_rt::test]
    async fn test_fingerprint_mismatch_is_rejected_as_plain_401() {
        let sessions = sessions();
        let token = issue(&sessions).await;

        let req = actix_test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .insert_header(("X-Forwarded-For", "9.9.9.9"))
            .insert_header((header::USER_AGENT, "A"))
            .app_data(web::Data::new(sessions))
            .to_http_request();

        let err = TestAuth::extract(&req).await.unwrap_err();
        assert_eq!(err.error, AuthError::FingerprintMismatch);

        let response = err.error_response();
        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_revoked_token_is_rejected() {
        let sessions = sessions();
        let token = issue(&sessions).await;
        sessions.revoke(&token).await.unwrap();

        let req = actix_test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .insert_header(("X-Forwarded-For", "1.2.3.4"))
            .insert_header((header::USER_AGENT, "A"))
            .app_data(web::Data::new(sessions))
            .to_http_request();

        let err = TestAuth::extract(&req).await.unwrap_err();
        assert_eq!(err.error, AuthError::TokenRevoked);
    }

    #[actix_rt::test]
    async fn test_fingerprint_prefers_forwarded_for() {
        let req = actix_test::TestRequest::default()
            .insert_header(("X-Forwarded-For", "1.2.3.4"))
            .insert_header((header::USER_AGENT, "agent"))
            .peer_addr("10.0.0.1:4444".parse().unwrap())
            .to_http_request();

        let fingerprint = fingerprint_from_request(&req);
        assert_eq!(fingerprint, Fingerprint::new("1.2.3.4", "agent"));
    }

    #[actix_rt::test]
    async fn test_fingerprint_falls_back_to_peer_address() {
        let req = actix_test::TestRequest::default()
            .peer_addr("10.0.0.1:4444".parse().unwrap())
            .to_http_request();

        let fingerprint = fingerprint_from_request(&req);
        assert_eq!(fingerprint, Fingerprint::new("10.0.0.1", ""));
    }
}
