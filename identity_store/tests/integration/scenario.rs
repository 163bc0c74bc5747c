use identity_store::{ApiKey, Right, User, UserError, UserWithAttributes, ValidationToken};
use serde_json::json;

use crate::common::{attributes, memory_store, with_attributes};

/// Walks one account through its whole lifecycle on a single store
#[tokio::test]
async fn test_account_lifecycle() {
    let store = memory_store().await;

    store
        .create(&User::new("alice", "Alice", "alice@example.com", "secret"))
        .await
        .expect("Failed to create alice");

    let taken = store
        .create(&User::new("ALICE", "Impostor", "bob@example.com", "secret"))
        .await;
    assert!(
        matches!(taken, Err(UserError::UserIdTaken { .. })),
        "unexpected result: {taken:?}"
    );

    let alice = store
        .get_by_id("Alice", User::default)
        .await
        .expect("Failed to get alice");
    assert_eq!(alice.user_id, "alice");
    assert_eq!(alice.email, "alice@example.com");
    assert_eq!(alice.name, "Alice");

    // The impostor's email must not have been claimed by the failed create
    let bob = store.get_by_email("bob@example.com", User::default).await;
    assert!(matches!(bob, Err(UserError::UserEmailNotFound { .. })));

    // Validate the email address
    let token = ValidationToken::generate(3600);
    store
        .save_validation_token("alice", &token)
        .await
        .expect("Failed to save token");
    let fetched = store
        .get_validation_token("alice", &token.validation_token)
        .await
        .expect("Failed to get token");
    let mut validated = UserWithAttributes::new(alice, attributes(&[("locale", json!("en"))]));
    validated.user.validated_at = Some(fetched.created_at);
    store
        .update(&validated)
        .await
        .expect("Failed to mark alice validated");
    store
        .delete_validation_token("alice", &token.validation_token)
        .await
        .expect("Failed to delete token");

    let reloaded = store
        .get_by_email("ALICE@EXAMPLE.COM", with_attributes)
        .await
        .expect("Failed to reload alice");
    assert!(reloaded.user.is_validated());
    assert_eq!(reloaded.attributes, attributes(&[("locale", json!("en"))]));

    // Issue, narrow and revoke an API key
    let key = ApiKey::generate("laptop", vec![Right::UserInfo, Right::UserSettingsBasic]);
    store
        .save_api_key("alice", &key)
        .await
        .expect("Failed to save API key");
    store
        .update_api_key("alice", &ApiKey::new(&key.key, "laptop", vec![Right::UserInfo]))
        .await
        .expect("Failed to update API key");
    let listed = store
        .list_api_keys("alice")
        .await
        .expect("Failed to list API keys");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].rights, vec![Right::UserInfo]);

    store
        .delete_api_key("alice", "laptop")
        .await
        .expect("Failed to delete API key");
    assert!(
        store
            .list_api_keys("alice")
            .await
            .expect("Failed to list API keys")
            .is_empty()
    );
}
