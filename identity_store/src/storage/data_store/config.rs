//! Data store configuration

use std::{
    env,
    str::FromStr,
    sync::{Arc, LazyLock},
    time::Duration,
};

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::types::{DataStore, PostgresDataStore, SqliteDataStore};
use crate::storage::errors::StorageError;

/// Table prefix from environment variable
pub(crate) static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "ids_".to_string()));

/// Builds the data store described by `GENERIC_DATA_STORE_TYPE` and
/// `GENERIC_DATA_STORE_URL`.
pub fn data_store_from_env() -> Result<Arc<dyn DataStore>, StorageError> {
    let store_type = env::var("GENERIC_DATA_STORE_TYPE")
        .map_err(|_| StorageError::Config("GENERIC_DATA_STORE_TYPE must be set".to_string()))?;
    let store_url = env::var("GENERIC_DATA_STORE_URL")
        .map_err(|_| StorageError::Config("GENERIC_DATA_STORE_URL must be set".to_string()))?;

    connect_data_store(&store_type, &store_url)
}

/// Creates a lazily connecting pool for `store_type` (`sqlite` or `postgres`).
///
/// In-memory SQLite databases live and die with their connection, so their
/// pool is pinned to a single connection that never expires.
pub fn connect_data_store(
    store_type: &str,
    store_url: &str,
) -> Result<Arc<dyn DataStore>, StorageError> {
    tracing::info!(
        "Initializing data store with type: {}, url: {}",
        store_type,
        store_url
    );

    let store: Arc<dyn DataStore> = match store_type {
        "sqlite" => {
            let opts = SqliteConnectOptions::from_str(store_url)
                .map_err(|e| {
                    StorageError::Config(format!("Failed to parse SQLite connection string: {e}"))
                })?
                .create_if_missing(true);

            let pool_options = if is_sqlite_in_memory(store_url) {
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None::<Duration>)
                    .max_lifetime(None::<Duration>)
            } else {
                SqlitePoolOptions::new()
            };

            Arc::new(SqliteDataStore {
                pool: pool_options.connect_lazy_with(opts),
            })
        }
        "postgres" => Arc::new(PostgresDataStore {
            pool: PgPoolOptions::new()
                .connect_lazy(store_url)
                .map_err(|e| StorageError::Config(format!("Failed to create Postgres pool: {e}")))?,
        }),
        t => {
            return Err(StorageError::Config(format!(
                "Unsupported store type: {t}. Supported types are 'sqlite' and 'postgres'"
            )));
        }
    };

    tracing::info!("Data store ready: type={}", store_type);

    Ok(store)
}

fn is_sqlite_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
