//! Integration tests for the Redis revocation store
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p atlas_infra --test redis_integration -- --ignored

use std::sync::Arc;

use atlas_core::repositories::RevocationStore;
use atlas_core::services::token::{TokenService, TokenServiceConfig};
use atlas_infra::cache::{RedisClient, RedisRevocationStore};
use atlas_shared::config::CacheConfig;

fn test_config() -> CacheConfig {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    CacheConfig::new(url).with_prefix(format!("atlas-test-{}", std::process::id()))
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_redis_connection() {
    let client = RedisClient::new(&test_config()).await;
    assert!(client.is_ok(), "Failed to connect to Redis");
    assert!(client.unwrap().health_check().await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_store_ping_within_response_timeout() {
    let mut config = test_config();
    config.response_timeout = 1;
    let store = RedisRevocationStore::connect(config).await.unwrap();
    assert!(store.ping().await.is_ok());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_delete_is_reported_once() {
    let store = RedisRevocationStore::connect(test_config()).await.unwrap();

    store.set_with_expiry("refresh:it-delete", "42", 60).await.unwrap();
    assert_eq!(store.get("refresh:it-delete").await.unwrap(), Some("42".to_string()));

    assert!(store.delete("refresh:it-delete").await.unwrap());
    assert!(!store.delete("refresh:it-delete").await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_expiry() {
    let store = RedisRevocationStore::connect(test_config()).await.unwrap();

    store.set_with_expiry("blacklist:it-expiry", "1", 1).await.unwrap();
    assert!(store.exists("blacklist:it-expiry").await.unwrap());

    tokio::time::sleep(tokio::time::Duration::from_millis(1500)).await;
    assert!(!store.exists("blacklist:it-expiry").await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_scan_strips_prefix() {
    let store = RedisRevocationStore::connect(test_config()).await.unwrap();
    store.set_with_expiry("refresh:it-scan", "42", 60).await.unwrap();

    let mut cursor = 0;
    let mut found = Vec::new();
    loop {
        let (next, keys) = store.scan(cursor, "refresh:*", 100).await.unwrap();
        found.extend(keys);
        if next == 0 {
            break;
        }
        cursor = next;
    }

    assert!(found.iter().any(|k| k == "refresh:it-scan"));
    store.delete("refresh:it-scan").await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_concurrent_rotation_has_one_winner() {
    let store = Arc::new(RedisRevocationStore::connect(test_config()).await.unwrap());
    let tokens = Arc::new(TokenService::new(
        store,
        TokenServiceConfig::new("integration-secret"),
    ));

    let refresh = tokens.issuer().issue_refresh_token("7").await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let tokens = tokens.clone();
            let refresh = refresh.clone();
            tokio::spawn(async move { tokens.rotate(&refresh).await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}
