use chrono::{TimeZone, Utc};
use identity_store::{User, UserError};

use crate::common::{TestUsers, memory_store};

#[tokio::test]
async fn test_create_and_get_user_ignores_case() {
    let store = memory_store().await;
    let alice = User::new("Alice", "Alice", "A@X.io", "alice-secret");
    store.create(&alice).await.expect("Failed to create user");

    let by_id = store
        .get_by_id("ALICE", User::default)
        .await
        .expect("Failed to get user by id");
    assert_eq!(by_id.user_id, "alice");
    assert_eq!(by_id.email, "a@x.io");
    assert_eq!(by_id.name, "Alice");
    assert_eq!(by_id.password, "alice-secret");
    assert!(!by_id.admin);
    assert!(!by_id.is_validated());

    let by_email = store
        .get_by_email("a@X.IO", User::default)
        .await
        .expect("Failed to get user by email");
    assert_eq!(by_email, by_id);
}

#[tokio::test]
async fn test_duplicate_user_id_in_other_case_is_taken() {
    let store = memory_store().await;
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create user");

    let result = store
        .create(&User::new("ALICE", "Other", "other@x.io", "secret"))
        .await;

    assert!(
        matches!(result, Err(UserError::UserIdTaken { ref user_id }) if user_id == "alice"),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn test_duplicate_email_in_other_case_is_taken() {
    let store = memory_store().await;
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create user");

    let result = store
        .create(&User::new("alice2", "Alice Two", "A@x.io", "secret"))
        .await;

    assert!(
        matches!(result, Err(UserError::UserEmailTaken { ref email }) if email == "a@x.io"),
        "unexpected result: {result:?}"
    );
    let missing = store.get_by_id("alice2", User::default).await;
    assert!(matches!(missing, Err(UserError::UserNotFound { .. })));
}

#[tokio::test]
async fn test_lookups_on_empty_store() {
    let store = memory_store().await;

    let by_id = store.get_by_id("nobody", User::default).await;
    assert!(
        matches!(by_id, Err(UserError::UserNotFound { ref user_id }) if user_id == "nobody"),
        "unexpected result: {by_id:?}"
    );

    let by_email = store.get_by_email("nobody@x.io", User::default).await;
    assert!(
        matches!(by_email, Err(UserError::UserEmailNotFound { ref email }) if email == "nobody@x.io"),
        "unexpected result: {by_email:?}"
    );
}

#[tokio::test]
async fn test_update_overwrites_mutable_fields() {
    let store = memory_store().await;
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create user");
    let before = store
        .get_by_id("alice", User::default)
        .await
        .expect("Failed to get user");

    let validated_at = Utc
        .with_ymd_and_hms(2026, 3, 14, 15, 9, 26)
        .single()
        .expect("valid timestamp");
    let mut changed = before.clone();
    changed.name = "Alice Liddell".to_string();
    changed.email = "Alice@Wonder.land".to_string();
    changed.password = "new-secret".to_string();
    changed.validated_at = Some(validated_at);
    changed.admin = true;
    store.update(&changed).await.expect("Failed to update user");

    let after = store
        .get_by_email("alice@wonder.land", User::default)
        .await
        .expect("Failed to get user by new email");
    assert_eq!(after.user_id, "alice");
    assert_eq!(after.name, "Alice Liddell");
    assert_eq!(after.email, "alice@wonder.land");
    assert_eq!(after.password, "new-secret");
    assert_eq!(after.validated_at, Some(validated_at));
    assert!(after.admin);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);

    let old_email = store.get_by_email("a@x.io", User::default).await;
    assert!(matches!(old_email, Err(UserError::UserEmailNotFound { .. })));
}

#[tokio::test]
async fn test_update_to_taken_email_is_rejected() {
    let store = memory_store().await;
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create alice");
    store
        .create(&TestUsers::bob())
        .await
        .expect("Failed to create bob");

    let mut bob = TestUsers::bob();
    bob.email = "A@X.IO".to_string();
    let result = store.update(&bob).await;

    assert!(
        matches!(result, Err(UserError::UserEmailTaken { ref email }) if email == "a@x.io"),
        "unexpected result: {result:?}"
    );
    let unchanged = store
        .get_by_id("bob", User::default)
        .await
        .expect("Failed to get bob");
    assert_eq!(unchanged.email, "b@x.io");
}
