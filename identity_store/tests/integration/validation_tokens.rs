use chrono::{Duration, Utc};
use identity_store::{UserError, ValidationToken};

use crate::common::{TestUsers, memory_store};

#[tokio::test]
async fn test_token_lifecycle() {
    let store = memory_store().await;
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create user");

    let token = ValidationToken::new("T1", 3600);
    store
        .save_validation_token("alice", &token)
        .await
        .expect("Failed to save token");

    let fetched = store
        .get_validation_token("ALICE", "T1")
        .await
        .expect("Failed to get token");
    assert_eq!(fetched.validation_token, "T1");
    assert_eq!(fetched.expires_in, 3600);
    assert!(!fetched.is_expired(fetched.created_at + Duration::seconds(10)));
    assert!(fetched.is_expired(Utc::now() + Duration::hours(2)));

    store
        .delete_validation_token("alice", "T1")
        .await
        .expect("First delete should succeed");

    let second = store.delete_validation_token("alice", "T1").await;
    assert!(
        matches!(second, Err(UserError::ValidationTokenNotFound)),
        "unexpected result: {second:?}"
    );
    let lookup = store.get_validation_token("alice", "T1").await;
    assert!(matches!(lookup, Err(UserError::ValidationTokenNotFound)));
}

#[tokio::test]
async fn test_token_is_bound_to_its_user() {
    let store = memory_store().await;
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create alice");
    store
        .create(&TestUsers::bob())
        .await
        .expect("Failed to create bob");
    store
        .save_validation_token("alice", &ValidationToken::new("shared", 60))
        .await
        .expect("Failed to save token");

    let other_user = store.get_validation_token("bob", "shared").await;
    assert!(matches!(other_user, Err(UserError::ValidationTokenNotFound)));

    let delete_other = store.delete_validation_token("bob", "shared").await;
    assert!(matches!(delete_other, Err(UserError::ValidationTokenNotFound)));

    store
        .get_validation_token("alice", "shared")
        .await
        .expect("Token should survive a delete by another user");
}

#[tokio::test]
async fn test_duplicate_token_is_unclassified_storage_error() {
    let store = memory_store().await;
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create user");
    let token = ValidationToken::generate(60);
    store
        .save_validation_token("alice", &token)
        .await
        .expect("Failed to save token");

    let result = store.save_validation_token("alice", &token).await;

    assert!(
        matches!(result, Err(UserError::Database(_))),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn test_token_with_unbounded_lifetime() {
    let store = memory_store().await;
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create user");
    store
        .save_validation_token("alice", &ValidationToken::new("forever", i64::MAX))
        .await
        .expect("Failed to save token");

    let fetched = store
        .get_validation_token("alice", "forever")
        .await
        .expect("Failed to get token");

    assert_eq!(fetched.expires_in, i64::MAX);
    assert_eq!(fetched.expires_at(), None);
    assert!(!fetched.is_expired(Utc::now()));
}
