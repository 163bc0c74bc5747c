use sqlx::{Pool, Postgres, Sqlite};

#[derive(Clone, Debug)]
pub(crate) struct SqliteDataStore {
    pub(super) pool: sqlx::SqlitePool,
}

#[derive(Clone, Debug)]
pub(crate) struct PostgresDataStore {
    pub(super) pool: sqlx::PgPool,
}

/// Backend-erased handle on the connection pool the stores run against.
///
/// Exactly one of the accessors returns `Some`; stores dispatch on it.
pub trait DataStore: Send + Sync {
    /// The SQLite pool, when this store runs on SQLite
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>>;

    /// The PostgreSQL pool, when this store runs on PostgreSQL
    fn as_postgres(&self) -> Option<&Pool<Postgres>>;
}

impl DataStore for SqliteDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        Some(&self.pool)
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        None
    }
}

impl DataStore for PostgresDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        None
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        Some(&self.pool)
    }
}
