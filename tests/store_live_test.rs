//! Live Postgres tests - ignored by default, run with:
//! `MUNIN_TEST_DATABASE_URL=postgres://munin@localhost/munin_test cargo test --test store_live_test -- --ignored`
//!
//! Keywords are made unique per run so repeated runs against the same
//! database do not interfere.

use munin::config::DatabaseConfig;
use munin::{CacheStore, PgCacheStore};

async fn connect() -> PgCacheStore {
    let url = std::env::var("MUNIN_TEST_DATABASE_URL")
        .expect("MUNIN_TEST_DATABASE_URL must be set for live tests");
    let store = PgCacheStore::connect(&url, &DatabaseConfig::default())
        .await
        .expect("failed to connect");
    store
        .ensure_schema()
        .await
        .expect("failed to create schema");
    store
}

fn unique(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{}-{nanos}", std::process::id())
}

#[tokio::test]
#[ignore]
async fn insert_lookup_round_trip() {
    let store = connect().await;
    let keyword = unique("hello");

    store
        .insert(&keyword, "greeting", "你好")
        .await
        .expect("insert failed");

    let entry = store
        .lookup(&keyword, "greeting")
        .await
        .expect("lookup failed")
        .expect("entry should exist");

    assert!(entry.id > 0);
    assert_eq!(entry.keyword, keyword);
    assert_eq!(entry.context, "greeting");
    assert_eq!(entry.result, "你好");
}

#[tokio::test]
#[ignore]
async fn lookup_miss_returns_none() {
    let store = connect().await;
    let keyword = unique("never-inserted");

    let entry = store.lookup(&keyword, "").await.expect("lookup failed");
    assert!(entry.is_none());
}

#[tokio::test]
#[ignore]
async fn oldest_row_wins_on_duplicates() {
    let store = connect().await;
    let keyword = unique("dup");

    store.insert(&keyword, "", "first").await.unwrap();
    store.insert(&keyword, "", "second").await.unwrap();

    let entry = store.lookup(&keyword, "").await.unwrap().unwrap();
    assert_eq!(entry.result, "first");
}

#[tokio::test]
#[ignore]
async fn contexts_key_separate_rows() {
    let store = connect().await;
    let keyword = unique("bug");

    store.insert(&keyword, "", "虫子").await.unwrap();
    store
        .insert(&keyword, "a bug in the code", "程序里的错误")
        .await
        .unwrap();

    let bare = store.lookup(&keyword, "").await.unwrap().unwrap();
    assert_eq!(bare.result, "虫子");

    let contextual = store
        .lookup(&keyword, "a bug in the code")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(contextual.result, "程序里的错误");
}

#[tokio::test]
#[ignore]
async fn ensure_schema_is_idempotent() {
    let store = connect().await;
    store.ensure_schema().await.expect("second run failed");
    store.close().await;
}
