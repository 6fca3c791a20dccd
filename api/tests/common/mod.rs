//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test, Error,
};
use actix_http::Request;
use async_trait::async_trait;
use serde_json::{json, Value};

use atlas_api::AppState;
use atlas_core::errors::DomainError;
use atlas_core::repositories::RevocationStore;
use atlas_core::services::token::TokenServiceConfig;
use atlas_infra::{BcryptPasswordHasher, MemoryIdentityRepository, MemoryRevocationStore};
use atlas_shared::config::CookieConfig;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const PASSWORD: &str = "correct horse battery";

/// In-memory store that can be switched into a failing state
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryRevocationStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::store_unavailable("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl RevocationStore for FlakyStore {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64)
        -> Result<(), DomainError> {
        self.check()?;
        self.inner.set_with_expiry(key, value, ttl_seconds).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        self.check()?;
        self.inner.exists(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: usize)
        -> Result<(u64, Vec<String>), DomainError> {
        self.check()?;
        self.inner.scan(cursor, pattern, count).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.check()
    }
}

pub fn test_state() -> (AppState, Arc<FlakyStore>) {
    let store = Arc::new(FlakyStore::default());
    let state = AppState::with_token_config(
        Arc::clone(&store) as Arc<dyn RevocationStore>,
        Arc::new(MemoryIdentityRepository::new()),
        Arc::new(BcryptPasswordHasher::new(4)),
        TokenServiceConfig::new(TEST_SECRET),
        CookieConfig::default(),
    );
    (state, store)
}

/// Register an identity at `register_path` and log it in at `login_path`
///
/// Returns the token response body.
pub async fn register_and_login<S, B>(
    app: &S,
    register_path: &str,
    login_path: &str,
    email: &str,
) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let login = email.split('@').next().unwrap_or(email);
    let req = test::TestRequest::post()
        .uri(register_path)
        .set_json(json!({ "email": email, "login": login, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "registration failed");

    let req = test::TestRequest::post()
        .uri(login_path)
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "login failed");
    test::read_body_json(resp).await
}

/// `(name, value)` of every cookie set on a response
pub fn set_cookies<B>(resp: &ServiceResponse<B>) -> Vec<(String, String)> {
    resp.response()
        .cookies()
        .map(|c| (c.name().to_string(), c.value().to_string()))
        .collect()
}
