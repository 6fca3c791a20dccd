//! Unit tests for authentication service

use std::sync::Arc;

use crate::domain::entities::identity::IdentityClass;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{MockIdentityRepository, MockRevocationStore};
use crate::services::auth::{AuthService, RegisterIdentity};
use crate::services::token::{TokenService, TokenServiceConfig};

use super::mocks::PlainPasswordHasher;

type TestAuthService = AuthService<MockRevocationStore, MockIdentityRepository, PlainPasswordHasher>;

fn setup() -> (TestAuthService, Arc<TokenService<MockRevocationStore>>, Arc<MockIdentityRepository>) {
    let store = Arc::new(MockRevocationStore::new());
    let tokens = Arc::new(TokenService::new(store, TokenServiceConfig::new("auth-test-secret")));
    let identities = Arc::new(MockIdentityRepository::new());
    let service = AuthService::new(
        Arc::clone(&tokens),
        Arc::clone(&identities),
        Arc::new(PlainPasswordHasher),
    );
    (service, tokens, identities)
}

fn admin(email: &str, login: &str) -> RegisterIdentity {
    RegisterIdentity {
        email: email.to_string(),
        login: login.to_string(),
        password: "correct horse".to_string(),
        project_id: None,
    }
}

#[tokio::test]
async fn test_register_hashes_password() {
    let (service, _, _) = setup();

    let identity = service
        .register(IdentityClass::Admin, admin("ops@example.com", "ops"))
        .await
        .unwrap();

    assert_eq!(identity.class, IdentityClass::Admin);
    assert_eq!(identity.role, "admin");
    assert_eq!(identity.password_hash, "plain$correct horse");
}

#[tokio::test]
async fn test_register_rejects_duplicate_email_and_login() {
    let (service, _, _) = setup();
    service
        .register(IdentityClass::Admin, admin("ops@example.com", "ops"))
        .await
        .unwrap();

    let email = service
        .register(IdentityClass::Admin, admin("ops@example.com", "other"))
        .await;
    assert!(matches!(
        email,
        Err(DomainError::Auth(AuthError::IdentityExists { ref field })) if field == "email"
    ));

    let login = service
        .register(IdentityClass::Admin, admin("new@example.com", "ops"))
        .await;
    assert!(matches!(
        login,
        Err(DomainError::Auth(AuthError::IdentityExists { ref field })) if field == "login"
    ));
}

#[tokio::test]
async fn test_same_email_allowed_in_different_projects() {
    let (service, _, identities) = setup();
    for project_id in [1, 2] {
        let input = RegisterIdentity {
            project_id: Some(project_id),
            ..admin("user@example.com", "user")
        };
        service.register(IdentityClass::User, input).await.unwrap();
    }
    assert_eq!(identities.count().await, 2);
}

#[tokio::test]
async fn test_register_checks_project_scope() {
    let (service, _, _) = setup();

    let admin_with_project = RegisterIdentity {
        project_id: Some(1),
        ..admin("ops@example.com", "ops")
    };
    assert!(matches!(
        service.register(IdentityClass::Admin, admin_with_project).await,
        Err(DomainError::Validation { .. })
    ));

    assert!(matches!(
        service
            .register(IdentityClass::User, admin("u@example.com", "u"))
            .await,
        Err(DomainError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_login_issues_pair_for_identity() {
    let (service, tokens, _) = setup();
    let registered = service
        .register(IdentityClass::Admin, admin("ops@example.com", "ops"))
        .await
        .unwrap();

    let (identity, pair) = service
        .login(IdentityClass::Admin, "ops@example.com", "correct horse", None)
        .await
        .unwrap();

    assert_eq!(identity.id, registered.id);
    let claims = tokens.validator().validate(&pair.access_token).await.unwrap();
    assert_eq!(claims.sub, registered.id.to_string());
    assert!(tokens.validate_active_refresh(&pair.refresh_token).await.is_ok());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (service, _, _) = setup();
    service
        .register(IdentityClass::Admin, admin("ops@example.com", "ops"))
        .await
        .unwrap();

    let wrong_password = service
        .login(IdentityClass::Admin, "ops@example.com", "wrong", None)
        .await;
    let unknown_email = service
        .login(IdentityClass::Admin, "nobody@example.com", "correct horse", None)
        .await;

    assert!(matches!(wrong_password, Err(DomainError::Auth(AuthError::InvalidCredentials))));
    assert!(matches!(unknown_email, Err(DomainError::Auth(AuthError::InvalidCredentials))));
}

#[tokio::test]
async fn test_user_login_is_scoped_to_project() {
    let (service, _, _) = setup();
    let input = RegisterIdentity {
        project_id: Some(1),
        ..admin("user@example.com", "user")
    };
    service.register(IdentityClass::User, input).await.unwrap();

    assert!(service
        .login(IdentityClass::User, "user@example.com", "correct horse", Some(1))
        .await
        .is_ok());
    assert!(service
        .login(IdentityClass::User, "user@example.com", "correct horse", Some(2))
        .await
        .is_err());
}

#[tokio::test]
async fn test_verified_email_sign_in_creates_once() {
    let (service, _, identities) = setup();

    let (first, _) = service
        .sign_in_verified_email(IdentityClass::Admin, "sso@example.com", None)
        .await
        .unwrap();
    let (second, _) = service
        .sign_in_verified_email(IdentityClass::Admin, "sso@example.com", None)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(identities.count().await, 1);
    assert!(first.password_hash.len() > "plain$".len() + 40);
}

#[tokio::test]
async fn test_refresh_rotates_and_old_token_fails() {
    let (service, _, _) = setup();
    service
        .register(IdentityClass::Admin, admin("ops@example.com", "ops"))
        .await
        .unwrap();
    let (identity, pair) = service
        .login(IdentityClass::Admin, "ops@example.com", "correct horse", None)
        .await
        .unwrap();

    let (new_pair, subject) = service.refresh(IdentityClass::Admin, &pair.refresh_token).await.unwrap();
    assert_eq!(subject, identity.subject());
    assert_ne!(new_pair.refresh_token, pair.refresh_token);

    assert!(matches!(
        service.refresh(IdentityClass::Admin, &pair.refresh_token).await,
        Err(DomainError::Token(TokenError::Revoked))
    ));
}

#[tokio::test]
async fn test_login_scopes_tokens_to_class() {
    let (service, tokens, _) = setup();
    service
        .register(IdentityClass::Admin, admin("ops@example.com", "ops"))
        .await
        .unwrap();
    let (_, pair) = service
        .login(IdentityClass::Admin, "ops@example.com", "correct horse", None)
        .await
        .unwrap();

    let claims = tokens.codec().decode(&pair.access_token).unwrap();
    assert_eq!(claims.class, Some(IdentityClass::Admin));

    assert!(matches!(
        service.refresh(IdentityClass::User, &pair.refresh_token).await,
        Err(DomainError::Token(TokenError::WrongClass))
    ));
    let (rotated, _) = service
        .refresh(IdentityClass::Admin, &pair.refresh_token)
        .await
        .unwrap();
    let claims = tokens.codec().decode(&rotated.refresh_token).unwrap();
    assert_eq!(claims.class, Some(IdentityClass::Admin));
}

#[tokio::test]
async fn test_logout_revokes_presented_tokens() {
    let (service, tokens, _) = setup();
    let pair = tokens.issuer().issue_pair("42").await.unwrap();

    assert!(service
        .logout(Some(&pair.access_token), Some(&pair.refresh_token))
        .await
        .unwrap());

    assert!(tokens.validator().validate(&pair.access_token).await.is_err());
    assert!(service.refresh(IdentityClass::Admin, &pair.refresh_token).await.is_err());
    assert!(!service.logout(Some("garbage"), None).await.unwrap());
    assert!(!service.logout(None, None).await.unwrap());
}

#[tokio::test]
async fn test_logout_all_revokes_every_session() {
    let (service, tokens, _) = setup();
    let first = tokens.issuer().issue_pair("42").await.unwrap();
    let second = tokens.issuer().issue_pair("42").await.unwrap();
    let other = tokens.issuer().issue_pair("43").await.unwrap();

    assert_eq!(service.logout_all("42").await.unwrap(), 2);

    assert!(service.refresh(IdentityClass::Admin, &first.refresh_token).await.is_err());
    assert!(service.refresh(IdentityClass::Admin, &second.refresh_token).await.is_err());
    assert!(service.refresh(IdentityClass::Admin, &other.refresh_token).await.is_ok());
}
