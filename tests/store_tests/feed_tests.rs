use std::fs;

use recordstore::{StoreError, WriteOptions};

use crate::common::{record, setup_temp_store};

// =============================================================================
// feed() Tests
// =============================================================================

#[tokio::test]
async fn test_feed_returns_records_in_request_order() {
    let (_temp, store) = setup_temp_store();
    store
        .write(
            "posts",
            vec![record("a", "1"), record("b", "2"), record("c", "3")],
            WriteOptions::default(),
        )
        .await;

    let feed = store.feed("posts", ["c", "a", "b"]).await;

    assert!(feed.all_fulfilled());
    assert_eq!(
        feed.into_fulfilled(),
        vec![record("c", "3"), record("a", "1"), record("b", "2")]
    );
}

#[tokio::test]
async fn test_feed_partial_failure() {
    let (_temp, store) = setup_temp_store();
    store
        .write("posts", record("valid", "ok"), WriteOptions::default())
        .await;

    let feed = store.feed("posts", ["valid", "missing"]).await;

    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].value(), Some(&record("valid", "ok")));
    assert!(matches!(
        feed[1].error(),
        Some(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_feed_corrupt_record_is_rejected() {
    let (temp, store) = setup_temp_store();
    store
        .write("posts", record("good", "ok"), WriteOptions::default())
        .await;
    fs::write(temp.path().join("posts").join("bad"), b"nope").unwrap();

    let feed = store.feed("posts", vec!["bad".to_string(), "good".to_string()]).await;

    assert!(matches!(
        feed[0].error(),
        Some(StoreError::MalformedPayload { .. })
    ));
    assert!(feed[1].is_fulfilled());
}

#[tokio::test]
async fn test_feed_missing_ref_rejects_each_item() {
    let (_temp, store) = setup_temp_store();

    let feed = store.feed("missing-ref", ["a", "b"]).await;

    assert_eq!(feed.rejected_count(), 2);
}

#[tokio::test]
async fn test_feed_invalid_identifier_is_isolated() {
    let (_temp, store) = setup_temp_store();
    store
        .write("posts", record("a", "1"), WriteOptions::default())
        .await;

    let feed = store.feed("posts", ["../a", "a"]).await;

    assert!(matches!(
        feed[0].error(),
        Some(StoreError::InvalidName { .. })
    ));
    assert!(feed[1].is_fulfilled());
}

#[tokio::test]
async fn test_feed_of_ls() {
    let (temp, store) = setup_temp_store();
    store
        .write(
            "posts",
            vec![record("a", "1"), record("b", "2")],
            WriteOptions::default(),
        )
        .await;
    fs::write(temp.path().join("posts").join("meta"), b"{}").unwrap();

    let ids = store.ls("posts").await.unwrap();
    let feed = store.feed("posts", &ids).await;

    assert_eq!(feed.len(), 2);
    assert!(feed.all_fulfilled());
}

#[tokio::test]
async fn test_feed_empty_request() {
    let (_temp, store) = setup_temp_store();

    let feed = store.feed("posts", Vec::<String>::new()).await;

    assert!(feed.is_empty());
}
