use std::fs;

use recordstore::{ReadOutcome, StoreError, WriteOptions};
use serde_json::json;

use crate::common::{record, setup_temp_store};

// =============================================================================
// read() Tests
// =============================================================================

#[tokio::test]
async fn test_round_trip() {
    let (_temp, store) = setup_temp_store();
    let original = json!({
        "about": { "identifier": "first-post", "tags": ["a", "b"] },
        "body": "hello",
        "score": 4.5,
        "nested": { "deep": [1, 2, { "x": null }] },
    });

    let result = store.write("posts", original.clone(), WriteOptions::default()).await;
    assert!(result.all_fulfilled());

    assert_eq!(store.read("posts", "first-post").await, original);
}

#[tokio::test]
async fn test_read_missing_ref_returns_empty_object() {
    let (_temp, store) = setup_temp_store();

    assert_eq!(store.read("missing-ref", "x").await, json!({}));
}

#[tokio::test]
async fn test_read_missing_record_returns_empty_object() {
    let (_temp, store) = setup_temp_store();
    store
        .write("posts", record("a", "alpha"), WriteOptions::default())
        .await;

    assert_eq!(store.read("posts", "b").await, json!({}));
}

#[tokio::test]
async fn test_read_corrupt_record_returns_empty_object() {
    let (temp, store) = setup_temp_store();
    let posts = temp.path().join("posts");
    fs::create_dir(&posts).unwrap();
    fs::write(posts.join("broken"), b"{ not json").unwrap();

    assert_eq!(store.read("posts", "broken").await, json!({}));
}

#[tokio::test]
async fn test_read_invalid_names_return_empty_object() {
    let (_temp, store) = setup_temp_store();

    assert_eq!(store.read("..", "x").await, json!({}));
    assert_eq!(store.read("posts", "../../etc/passwd").await, json!({}));
}

// =============================================================================
// lookup() Tests
// =============================================================================

#[tokio::test]
async fn test_lookup_distinguishes_failure_kinds() {
    let (temp, store) = setup_temp_store();
    store
        .write("posts", record("good", "ok"), WriteOptions::default())
        .await;
    fs::write(temp.path().join("posts").join("bad"), b"]").unwrap();

    assert!(matches!(
        store.lookup("posts", "good").await,
        ReadOutcome::Found(_)
    ));
    assert!(matches!(
        store.lookup("posts", "nope").await,
        ReadOutcome::NotFound
    ));
    assert!(matches!(
        store.lookup("missing-ref", "good").await,
        ReadOutcome::NotFound
    ));
    assert!(matches!(
        store.lookup("posts", "bad").await,
        ReadOutcome::Corrupt(StoreError::MalformedPayload { .. })
    ));
    assert!(matches!(
        store.lookup("posts", "a/b").await,
        ReadOutcome::Failed(StoreError::InvalidName { .. })
    ));
}

#[tokio::test]
async fn test_lookup_can_read_reserved_entry() {
    let (temp, store) = setup_temp_store();
    let posts = temp.path().join("posts");
    fs::create_dir(&posts).unwrap();
    fs::write(posts.join("meta"), br#"{"count":0}"#).unwrap();

    let outcome = store.lookup("posts", "meta").await;
    assert_eq!(outcome.into_option(), Some(json!({ "count": 0 })));
}
