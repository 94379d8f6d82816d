use std::time::Duration;

use shortly_cache::RedisBackend;
use shortly_core::{Identifier, StorageBackend, StorageError};
use shortly_test_infra::redis::RedisServer;

async fn start() -> (RedisServer, RedisBackend) {
    let server = RedisServer::new().await.expect("start redis");
    let url = server.url().await.expect("redis url");
    let backend = RedisBackend::connect(&url).await.expect("connect redis");
    (server, backend)
}

fn id(value: &str) -> Identifier {
    Identifier::new(value).unwrap()
}

#[tokio::test]
async fn put_and_get_roundtrip() {
    let (_server, cache) = start().await;
    let key = id("abcdefghijUuY29t");

    cache.put(&key, "http://example.com").await.unwrap();

    let got = cache.get(&key).await.unwrap();
    assert_eq!(got.as_deref(), Some("http://example.com"));
}

#[tokio::test]
async fn get_missing_key_is_a_miss() {
    let (_server, cache) = start().await;

    let got = cache.get(&id("doesnotexist0000")).await.unwrap();
    assert!(got.is_none());
}

#[tokio::test]
async fn put_does_not_overwrite_cached_identifier() {
    let (_server, cache) = start().await;
    let key = id("abcdefghijUuY29t");

    cache.put(&key, "http://example.com").await.unwrap();
    let err = cache.put(&key, "http://other.com").await.unwrap_err();

    assert!(matches!(err, StorageError::Conflict(_)));
    assert_eq!(
        cache.get(&key).await.unwrap().as_deref(),
        Some("http://example.com")
    );
}

#[tokio::test]
async fn entries_expire_after_ttl() {
    let (_server, cache) = start().await;
    let cache = cache.with_ttl(Duration::from_secs(1));
    let key = id("abcdefghijUuY29t");

    cache.put(&key, "http://example.com").await.unwrap();
    tokio::time::sleep(Duration::from_millis(2100)).await;

    assert!(cache.get(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn prefixes_isolate_keyspaces() {
    let (_server, cache) = start().await;
    let other = cache.clone().with_prefix("other:url:");
    let key = id("abcdefghijUuY29t");

    cache.put(&key, "http://example.com").await.unwrap();

    assert!(other.get(&key).await.unwrap().is_none());
}
