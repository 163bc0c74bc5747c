//! Shared helpers for unit tests
//!
//! Every helper hands out a fresh in-memory SQLite database, so tests never
//! see each other's rows and can run in parallel.

use std::sync::Once;
use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use crate::storage::connect_data_store;
use crate::userdb::UserStore;

const MEMORY_URL: &str = "sqlite::memory:";

/// Loads `.env_test` (falling back to `.env`) once per test binary
pub(crate) fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });
}

/// Single-connection pool on a private in-memory database
pub(crate) async fn sqlite_pool() -> Pool<Sqlite> {
    init_test_environment();
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect(MEMORY_URL)
        .await
        .expect("Failed to open in-memory SQLite database")
}

/// Initialized user store on a private in-memory database
pub(crate) async fn test_store() -> UserStore {
    init_test_environment();
    let data_store =
        connect_data_store("sqlite", MEMORY_URL).expect("Failed to create in-memory data store");
    let store = UserStore::new(data_store);
    store.init().await.expect("Failed to initialize user store");
    store
}
