use std::{env, sync::LazyLock};

use crate::storage::DB_TABLE_PREFIX;

/// Extra attributes table name
pub(crate) static DB_TABLE_ATTRIBUTES: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_ATTRIBUTES")
        .unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "attributes"))
});
