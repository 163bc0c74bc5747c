use identity_store::{Attributes, User, UserWithAttributes};
use serde_json::Value;

/// Test user fixtures
pub struct TestUsers;

impl TestUsers {
    pub fn alice() -> User {
        User::new("alice", "Alice", "a@x.io", "alice-secret")
    }

    pub fn bob() -> User {
        User::new("bob", "Bob", "b@x.io", "bob-secret")
    }

    pub fn alice_with_attributes(attributes: Attributes) -> UserWithAttributes {
        UserWithAttributes::new(Self::alice(), attributes)
    }
}

pub fn attributes(pairs: &[(&str, Value)]) -> Attributes {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

/// Factory for lookups that should populate extra attributes
pub fn with_attributes() -> UserWithAttributes {
    UserWithAttributes::default()
}
