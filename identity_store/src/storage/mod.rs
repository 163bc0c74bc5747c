mod data_store;
mod duplicate;
mod errors;
mod schema_validation;

pub use data_store::{DataStore, connect_data_store, data_store_from_env};
pub use errors::StorageError;

pub(crate) use data_store::DB_TABLE_PREFIX;
pub(crate) use duplicate::duplicate_key;
pub(crate) use schema_validation::{validate_postgres_table_schema, validate_sqlite_table_schema};
