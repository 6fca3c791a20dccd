
use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::token::{Claims, TokenKind};
use crate::repositories::MockRevocationStore;
use crate::services::token::{TokenService, TokenServiceConfig};

pub(crate) const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

pub(crate) fn test_config() -> TokenServiceConfig {
    TokenServiceConfig::new(TEST_SECRET)
}

pub(crate) fn test_service() -> (TokenService<MockRevocationStore>, Arc<MockRevocationStore>) {
    let store = Arc::new(MockRevocationStore::new());
    (TokenService::new(Arc::clone(&store), test_config()), store)
}

/// Signed claims whose `exp` is already in the past
pub(crate) fn expired_claims(subject: &str, kind: TokenKind) -> Claims {
    let mut claims = Claims::new(subject, kind, 900);
    claims.iat = Utc::now().timestamp() - 1000;
    claims.exp = Utc::now().timestamp() - 100;
    claims
}
