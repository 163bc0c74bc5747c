use std::collections::HashSet;

use identity_store::{ApiKey, Right, UserError};

use crate::common::{TestUsers, memory_store};

fn rights_of(key: &ApiKey) -> HashSet<Right> {
    key.rights.iter().copied().collect()
}

#[tokio::test]
async fn test_save_and_get_api_key() {
    let store = memory_store().await;
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create user");

    let key = ApiKey::new(
        "k-123",
        "ci",
        vec![Right::UserInfo, Right::UserSettingsApiKeys, Right::UserInfo],
    );
    store
        .save_api_key("Alice", &key)
        .await
        .expect("Failed to save API key");

    let stored = store
        .get_api_key("alice", "ci")
        .await
        .expect("Failed to get API key");
    assert_eq!(stored.key, "k-123");
    assert_eq!(stored.name, "ci");
    assert_eq!(stored.rights.len(), 2);
    assert_eq!(
        rights_of(&stored),
        HashSet::from([Right::UserInfo, Right::UserSettingsApiKeys])
    );
}

#[tokio::test]
async fn test_update_replaces_rights() {
    let store = memory_store().await;
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create user");
    let key = ApiKey::generate("deploy", vec![Right::UserInfo, Right::UserSettingsBasic]);
    store
        .save_api_key("alice", &key)
        .await
        .expect("Failed to save API key");

    let replacement = ApiKey::new(
        "ignored-key-value",
        "deploy",
        vec![Right::UserSettingsBasic, Right::UserOrganizationsList],
    );
    store
        .update_api_key("alice", &replacement)
        .await
        .expect("Failed to update API key");

    let stored = store
        .get_api_key("alice", "deploy")
        .await
        .expect("Failed to get API key");
    assert_eq!(stored.key, key.key);
    assert_eq!(
        rights_of(&stored),
        HashSet::from([Right::UserSettingsBasic, Right::UserOrganizationsList])
    );
}

#[tokio::test]
async fn test_key_names_are_unique_per_user() {
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
        .save_api_key("alice", &ApiKey::generate("K", vec![Right::UserInfo]))
        .await
        .expect("Failed to save first key");

    let conflict = store
        .save_api_key("alice", &ApiKey::generate("K", vec![Right::UserSettingsBasic]))
        .await;
    assert!(
        matches!(conflict, Err(UserError::ApiKeyNameConflict { ref name }) if name == "K"),
        "unexpected result: {conflict:?}"
    );

    store
        .save_api_key("bob", &ApiKey::generate("K", vec![Right::UserInfo]))
        .await
        .expect("Same name for another user should succeed");

    let alice_key = store
        .get_api_key("alice", "K")
        .await
        .expect("Failed to get alice's key");
    assert_eq!(rights_of(&alice_key), HashSet::from([Right::UserInfo]));
}

#[tokio::test]
async fn test_list_api_keys_with_rights() {
    let store = memory_store().await;
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create user");
    for (name, rights) in [
        ("zeta", vec![Right::UserInfo]),
        ("alpha", vec![Right::UserApplicationsCreate, Right::UserDelete]),
        ("mid", Vec::new()),
    ] {
        store
            .save_api_key("alice", &ApiKey::generate(name, rights))
            .await
            .expect("Failed to save API key");
    }

    let keys = store
        .list_api_keys("ALICE")
        .await
        .expect("Failed to list API keys");

    let names: Vec<_> = keys.iter().map(|key| key.name.as_str()).collect();
    assert_eq!(names, ["alpha", "mid", "zeta"]);
    assert_eq!(
        rights_of(&keys[0]),
        HashSet::from([Right::UserApplicationsCreate, Right::UserDelete])
    );
    assert!(keys[1].rights.is_empty());
    assert_eq!(rights_of(&keys[2]), HashSet::from([Right::UserInfo]));

    let none = store
        .list_api_keys("bob")
        .await
        .expect("Listing for a user without keys should succeed");
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_delete_api_key() {
    let store = memory_store().await;
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create user");
    store
        .save_api_key("alice", &ApiKey::generate("old", vec![Right::UserInfo]))
        .await
        .expect("Failed to save API key");
    store
        .save_api_key("alice", &ApiKey::generate("kept", vec![Right::UserInfo, Right::UserSettingsBasic]))
        .await
        .expect("Failed to save API key");

    store
        .delete_api_key("alice", "old")
        .await
        .expect("Failed to delete API key");

    let gone = store.get_api_key("alice", "old").await;
    assert!(
        matches!(gone, Err(UserError::ApiKeyNotFound { ref name }) if name == "old"),
        "unexpected result: {gone:?}"
    );

    let missing = store.delete_api_key("alice", "old").await;
    assert!(matches!(missing, Err(UserError::ApiKeyNotFound { .. })));

    let kept = store
        .get_api_key("alice", "kept")
        .await
        .expect("Other keys must survive");
    assert_eq!(
        rights_of(&kept),
        HashSet::from([Right::UserInfo, Right::UserSettingsBasic])
    );
}

#[tokio::test]
async fn test_missing_key_lookups() {
    let store = memory_store().await;
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create user");

    let get = store.get_api_key("alice", "nope").await;
    assert!(matches!(get, Err(UserError::ApiKeyNotFound { .. })));

    let update = store
        .update_api_key("alice", &ApiKey::generate("nope", vec![Right::UserInfo]))
        .await;
    assert!(matches!(update, Err(UserError::ApiKeyNotFound { .. })));
}
