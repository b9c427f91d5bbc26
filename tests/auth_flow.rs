//! Full account lifecycle: sign-up, activation, sign-in, sign-out.
//!
//! Run with: `cargo test --features mocks --test auth_flow`

#![cfg(feature = "mocks")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use palisade::actions::{ActivateAccountAction, SignInAction, SignOutAction, SignUpAction};
use palisade::mail::MockMailer;
use palisade::session::{Fingerprint, SessionConfig, SessionService};
use palisade::{
    AuthError, MockSessionTokenRepository, MockUserRepository, MockVerificationTokenRepository,
};

const SECRET: &str = "integration-secret-32-bytes-long";

struct Stores {
    users: MockUserRepository,
    verifications: MockVerificationTokenRepository,
    tokens: MockSessionTokenRepository,
    mailer: MockMailer,
    sessions: SessionService<MockSessionTokenRepository, MockUserRepository>,
}

fn stores() -> Stores {
    let users = MockUserRepository::new();
    let verifications = MockVerificationTokenRepository::new();
    let tokens = MockSessionTokenRepository::new();
    let mailer = MockMailer::new();

    let config = SessionConfig::new(SECRET).unwrap();
    let sessions = SessionService::new(tokens.clone(), users.clone(), config);

    Stores {
        users,
        verifications,
        tokens,
        mailer,
        sessions,
    }
}

fn fingerprint() -> Fingerprint {
    Fingerprint::new("1.2.3.4", "Mozilla/5.0")
}

#[tokio::test]
async fn full_lifecycle_from_sign_up_to_sign_out() {
    let s = stores();

    // register
    let sign_up = SignUpAction::new(s.users.clone(), s.verifications.clone(), s.mailer.clone());
    let user = sign_up
        .execute("alice", "alice@example.com", "a-decent-password")
        .await
        .unwrap();
    assert!(!user.enabled);

    // a not-yet-activated account cannot sign in
    let sign_in = SignInAction::new(s.users.clone(), s.sessions.clone());
    let early = sign_in
        .execute("alice", "a-decent-password", &fingerprint())
        .await;
    assert_eq!(early.unwrap_err(), AuthError::AccountDisabled);

    // activate with the mailed token
    let verification_token = s.verifications.tokens.lock().unwrap()[0].token.clone();
    ActivateAccountAction::new(s.users.clone(), s.verifications.clone())
        .execute(&verification_token)
        .await
        .unwrap();

    // the activation token is consumed
    assert!(s.verifications.tokens.lock().unwrap().is_empty());

    // sign in and use the session
    let response = sign_in
        .execute("alice", "a-decent-password", &fingerprint())
        .await
        .unwrap();

    let identity = s
        .sessions
        .validate(&response.token, &fingerprint())
        .await
        .unwrap();
    assert_eq!(identity.user_id, user.id);
    assert!(identity.has_authority("USER"));

    // sign out ends the session
    SignOutAction::new(s.sessions.clone())
        .execute(&response.token, false)
        .await
        .unwrap();

    assert_eq!(
        s.sessions.validate(&response.token, &fingerprint()).await,
        Err(AuthError::TokenRevoked)
    );
}

#[tokio::test]
async fn sign_up_mails_exactly_one_verification_link() {
    let s = stores();

    let sign_up = SignUpAction::new(s.users.clone(), s.verifications.clone(), s.mailer.clone());
    sign_up
        .execute("alice", "alice@example.com", "a-decent-password")
        .await
        .unwrap();

    // the send is fire-and-forget; let the spawned task run
    tokio::task::yield_now().await;

    let sent = s.mailer.sent_mail();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "alice@example.com");

    let stored = s.verifications.tokens.lock().unwrap()[0].token.clone();
    assert_eq!(sent[0].1, stored);
}

#[tokio::test]
async fn broken_mail_backend_does_not_block_registration() {
    let s = stores();

    let sign_up = SignUpAction::new(
        s.users.clone(),
        s.verifications.clone(),
        MockMailer::failing(),
    );
    let result = sign_up
        .execute("alice", "alice@example.com", "a-decent-password")
        .await;

    assert!(result.is_ok());
    assert_eq!(s.users.users.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let s = stores();

    let sign_up = SignUpAction::new(s.users.clone(), s.verifications.clone(), s.mailer.clone());
    sign_up
        .execute("alice", "alice@example.com", "a-decent-password")
        .await
        .unwrap();

    let same_username = sign_up
        .execute("alice", "fresh@example.com", "another-password")
        .await;
    let same_email = sign_up
        .execute("fresh", "alice@example.com", "another-password")
        .await;

    assert_eq!(same_username.unwrap_err(), AuthError::UserAlreadyExists);
    assert_eq!(same_email.unwrap_err(), AuthError::UserAlreadyExists);
    assert_eq!(s.users.users.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn sign_out_everywhere_ends_every_session() {
    let s = stores();

    let sign_up = SignUpAction::new(s.users.clone(), s.verifications.clone(), s.mailer.clone());
    sign_up
        .execute("alice", "alice@example.com", "a-decent-password")
        .await
        .unwrap();
    let verification_token = s.verifications.tokens.lock().unwrap()[0].token.clone();
    ActivateAccountAction::new(s.users.clone(), s.verifications.clone())
        .execute(&verification_token)
        .await
        .unwrap();

    let sign_in = SignInAction::new(s.users.clone(), s.sessions.clone());
    let desktop = Fingerprint::new("1.2.3.4", "desktop");
    let phone = Fingerprint::new("5.6.7.8", "phone");

    let desktop_session = sign_in
        .execute("alice", "a-decent-password", &desktop)
        .await
        .unwrap();
    let phone_session = sign_in
        .execute("alice", "a-decent-password", &phone)
        .await
        .unwrap();

    // sign out everywhere from the phone
    SignOutAction::new(s.sessions.clone())
        .execute(&phone_session.token, true)
        .await
        .unwrap();

    assert_eq!(
        s.sessions.validate(&desktop_session.token, &desktop).await,
        Err(AuthError::TokenRevoked)
    );
    assert_eq!(
        s.sessions.validate(&phone_session.token, &phone).await,
        Err(AuthError::TokenRevoked)
    );

    // every record is retained, flagged invalid
    let records = s.tokens.records.lock().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| !r.is_valid));
}

#[tokio::test]
async fn sessions_issued_at_sign_in_are_persisted_records() {
    let s = stores();

    let sign_up = SignUpAction::new(s.users.clone(), s.verifications.clone(), s.mailer.clone());
    let user = sign_up
        .execute("alice", "alice@example.com", "a-decent-password")
        .await
        .unwrap();
    let verification_token = s.verifications.tokens.lock().unwrap()[0].token.clone();
    ActivateAccountAction::new(s.users.clone(), s.verifications.clone())
        .execute(&verification_token)
        .await
        .unwrap();

    let sign_in = SignInAction::new(s.users.clone(), s.sessions.clone());
    let response = sign_in
        .execute("alice@example.com", "a-decent-password", &fingerprint())
        .await
        .unwrap();

    let records = s.tokens.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].token, response.token);
    assert_eq!(records[0].user_id, user.id);
    assert!(records[0].is_valid);
    assert_eq!(records[0].expires_at.timestamp(), response.expires_at);
}
