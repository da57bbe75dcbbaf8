use auth_gate::auth::directory::{Principal, Role, UserDirectory};
use auth_gate::auth::strategy::{AuthEvidence, AuthStrategy, LoginOutcome, SessionAuth, TokenAuth};
use auth_gate::auth::token::{extract_bearer_token, Claims, TokenManager};
use auth_gate::core::session::create_session_store;
use auth_gate::error::AuthGateError;

const TEST_SECRET: &str = "integration-testing-signing-key-0123456789";

#[test]
fn test_valid_credentials_yield_directory_role() {
    let directory = UserDirectory::demo();

    let alice = directory.validate("alice", "alice123").unwrap();
    assert_eq!(alice.username, "alice");
    assert_eq!(alice.role, Role::User);

    let admin = directory.validate("admin", "admin123").unwrap();
    assert_eq!(admin.username, "admin");
    assert_eq!(admin.role, Role::Admin);
}

#[test]
fn test_invalid_credentials_are_opaque() {
    let directory = UserDirectory::demo();

    // Wrong password and unknown username fail with the same error kind
    let wrong_password = directory.validate("alice", "wrong").unwrap_err();
    let unknown_user = directory.validate("mallory", "alice123").unwrap_err();

    assert!(matches!(wrong_password, AuthGateError::InvalidCredentials));
    assert!(matches!(unknown_user, AuthGateError::InvalidCredentials));
}

#[test]
fn test_token_roundtrip_preserves_principal() {
    let tokens = TokenManager::new(TEST_SECRET, 3600);
    let principal = Principal {
        username: "alice".to_string(),
        role: Role::User,
    };

    let token = tokens.issue(&principal).unwrap();
    assert!(!token.is_empty());

    let verified = tokens.verify(&token).unwrap();
    assert_eq!(verified.username, "alice");
    assert_eq!(verified.role, Role::User);
}

#[test]
fn test_garbage_token_rejected() {
    let tokens = TokenManager::new(TEST_SECRET, 3600);

    let err = tokens.verify("not.a.token").unwrap_err();
    assert!(matches!(err, AuthGateError::InvalidToken));
}

#[test]
fn test_wrong_key_token_rejected() {
    let tokens = TokenManager::new(TEST_SECRET, 3600);
    let other = TokenManager::new("another-signing-key-9876543210-different", 3600);

    let principal = Principal {
        username: "alice".to_string(),
        role: Role::User,
    };
    let token = other.issue(&principal).unwrap();

    let err = tokens.verify(&token).unwrap_err();
    assert!(matches!(err, AuthGateError::InvalidToken));
}

#[test]
fn test_expired_token_fails_like_a_forged_one() {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let tokens = TokenManager::new(TEST_SECRET, 3600);

    // Sign an already-expired claim set with the correct key
    let expired = Claims {
        sub: "alice".to_string(),
        role: Role::User,
        exp: 1_000_000,
    };
    let token = encode(
        &Header::default(),
        &expired,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let expired_err = tokens.verify(&token).unwrap_err();
    let forged_err = tokens.verify("junk.junk.junk").unwrap_err();

    // Same opaque kind for both failure causes
    assert!(matches!(expired_err, AuthGateError::InvalidToken));
    assert!(matches!(forged_err, AuthGateError::InvalidToken));
    assert!(expired.is_expired());
}

#[test]
fn test_extract_bearer_token() {
    assert_eq!(
        extract_bearer_token("Bearer abc123"),
        Some("abc123".to_string())
    );
    assert_eq!(extract_bearer_token("Basic abc123"), None);
    assert_eq!(extract_bearer_token(""), None);
}

#[tokio::test]
async fn test_token_strategy_lifecycle() {
    let strategy = TokenAuth::new(TokenManager::new(TEST_SECRET, 3600));
    let principal = Principal {
        username: "admin".to_string(),
        role: Role::Admin,
    };

    let outcome = strategy.login(&principal).await.unwrap();
    let token = match outcome {
        LoginOutcome::Token { token } => token,
        other => panic!("expected a token outcome, got {:?}", other),
    };

    let evidence = AuthEvidence {
        bearer: Some(token),
        session_cookie: None,
    };
    let verified = strategy.authenticate(&evidence).await.unwrap();
    assert_eq!(verified.username, "admin");
    assert_eq!(verified.role, Role::Admin);

    // Logout is a no-op for tokens; the evidence stays verifiable
    strategy.logout(&evidence).await.unwrap();
    assert!(strategy.authenticate(&evidence).await.is_ok());
}

#[tokio::test]
async fn test_token_strategy_requires_bearer_evidence() {
    let strategy = TokenAuth::new(TokenManager::new(TEST_SECRET, 3600));

    let evidence = AuthEvidence {
        bearer: None,
        session_cookie: Some("some-session-id".to_string()),
    };
    let err = strategy.authenticate(&evidence).await.unwrap_err();
    assert!(matches!(err, AuthGateError::MissingAuthHeader));
}

#[tokio::test]
async fn test_session_strategy_lifecycle() {
    let store = create_session_store();
    let strategy = SessionAuth::new(store.clone(), false);
    let principal = Principal {
        username: "alice".to_string(),
        role: Role::User,
    };

    let outcome = strategy.login(&principal).await.unwrap();
    let session_id = match outcome {
        LoginOutcome::Session { session_id } => session_id,
        other => panic!("expected a session outcome, got {:?}", other),
    };

    let evidence = AuthEvidence {
        bearer: None,
        session_cookie: Some(session_id),
    };
    let verified = strategy.authenticate(&evidence).await.unwrap();
    assert_eq!(verified.username, "alice");
    assert_eq!(verified.role, Role::User);

    // Logout destroys the server-side record
    strategy.logout(&evidence).await.unwrap();
    let err = strategy.authenticate(&evidence).await.unwrap_err();
    assert!(matches!(err, AuthGateError::NoSession));
    assert_eq!(store.count().await, 0);
}
