use std::{env, sync::LazyLock};

use crate::storage::DB_TABLE_PREFIX;

/// Users table name
pub(crate) static DB_TABLE_USERS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_USERS").unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "users"))
});

/// Validation tokens table name
pub(crate) static DB_TABLE_VALIDATION_TOKENS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_VALIDATION_TOKENS")
        .unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "validation_tokens"))
});

/// API keys table name
pub(crate) static DB_TABLE_API_KEYS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_API_KEYS")
        .unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "api_keys"))
});

/// API key rights table name
pub(crate) static DB_TABLE_API_KEY_RIGHTS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_API_KEY_RIGHTS")
        .unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "api_key_rights"))
});
