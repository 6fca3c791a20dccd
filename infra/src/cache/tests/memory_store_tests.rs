use std::sync::Arc;
use std::time::Duration;

use atlas_core::errors::{DomainError, TokenError};
use atlas_core::repositories::RevocationStore;
use atlas_core::services::token::{TokenService, TokenServiceConfig};

use crate::cache::MemoryRevocationStore;

#[tokio::test]
async fn test_set_get_and_exists() {
    let store = MemoryRevocationStore::new();
    store.set_with_expiry("refresh:a", "42", 60).await.unwrap();

    assert_eq!(store.get("refresh:a").await.unwrap(), Some("42".to_string()));
    assert!(store.exists("refresh:a").await.unwrap());
    assert!(!store.exists("refresh:b").await.unwrap());
}

#[tokio::test]
async fn test_delete_reports_removal_once() {
    let store = MemoryRevocationStore::new();
    store.set_with_expiry("refresh:a", "42", 60).await.unwrap();

    assert!(store.delete("refresh:a").await.unwrap());
    assert!(!store.delete("refresh:a").await.unwrap());
    assert!(store.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_entries_expire() {
    let store = MemoryRevocationStore::new();
    store.set_with_expiry("blacklist:a", "1", 5).await.unwrap();

    tokio::time::advance(Duration::from_secs(4)).await;
    assert!(store.exists("blacklist:a").await.unwrap());

    tokio::time::advance(Duration::from_secs(2)).await;
    assert!(!store.exists("blacklist:a").await.unwrap());
    assert!(!store.delete("blacklist:a").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_zero_ttl_is_raised_to_one_second() {
    let store = MemoryRevocationStore::new();
    store.set_with_expiry("blacklist:a", "1", 0).await.unwrap();

    assert!(store.exists("blacklist:a").await.unwrap());
    tokio::time::advance(Duration::from_millis(1001)).await;
    assert!(!store.exists("blacklist:a").await.unwrap());
}

#[tokio::test]
async fn test_scan_pages_through_matching_keys() {
    let store = MemoryRevocationStore::new();
    for jti in ["a", "b", "c", "d", "e"] {
        store.set_with_expiry(&format!("refresh:{jti}"), "42", 60).await.unwrap();
    }
    store.set_with_expiry("blacklist:a", "1", 60).await.unwrap();

    let mut cursor = 0;
    let mut seen = Vec::new();
    loop {
        let (next, keys) = store.scan(cursor, "refresh:*", 2).await.unwrap();
        assert!(keys.len() <= 2);
        seen.extend(keys);
        if next == 0 {
            break;
        }
        cursor = next;
    }

    assert_eq!(
        seen,
        vec!["refresh:a", "refresh:b", "refresh:c", "refresh:d", "refresh:e"]
    );
}

#[tokio::test]
async fn test_scan_of_empty_store_finishes_immediately() {
    let store = MemoryRevocationStore::new();
    let (next, keys) = store.scan(0, "refresh:*", 10).await.unwrap();
    assert_eq!(next, 0);
    assert!(keys.is_empty());
}

#[tokio::test]
async fn test_scan_cursor_is_stable_when_keys_are_deleted() {
    let store = MemoryRevocationStore::new();
    for jti in ["a", "b", "c", "d", "e"] {
        store.set_with_expiry(&format!("refresh:{jti}"), "42", 60).await.unwrap();
    }

    let (next, first) = store.scan(0, "refresh:*", 2).await.unwrap();
    assert_eq!(first, vec!["refresh:a", "refresh:b"]);
    for key in &first {
        store.delete(key).await.unwrap();
    }

    let (next, second) = store.scan(next, "refresh:*", 2).await.unwrap();
    assert_eq!(second, vec!["refresh:c", "refresh:d"]);
    let (next, third) = store.scan(next, "refresh:*", 2).await.unwrap();
    assert_eq!(third, vec!["refresh:e"]);
    assert_eq!(next, 0);
}

#[tokio::test]
async fn test_revoke_all_across_pages_with_interleaved_subjects() {
    let store = Arc::new(MemoryRevocationStore::new());
    let mut config = TokenServiceConfig::new("memory-store-secret");
    config.scan_batch_size = 2;
    let service = TokenService::new(Arc::clone(&store), config);

    let mut mine = Vec::new();
    let mut others = Vec::new();
    for _ in 0..4 {
        mine.push(service.issuer().issue_refresh_token("42").await.unwrap());
        others.push(service.issuer().issue_refresh_token("43").await.unwrap());
    }
    mine.push(service.issuer().issue_refresh_token("42").await.unwrap());

    assert_eq!(service.revocations().revoke_all("42").await.unwrap(), 5);

    for token in &mine {
        assert!(matches!(
            service.validate_active_refresh(token).await,
            Err(DomainError::Token(TokenError::Revoked))
        ));
    }
    for token in &others {
        assert!(service.validate_active_refresh(token).await.is_ok());
    }
}
