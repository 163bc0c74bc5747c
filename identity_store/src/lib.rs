//! identity-store - Transactional persistence for user accounts
//!
//! This crate stores users together with the data hanging off them: open-ended
//! extra attributes, single-use validation tokens and API keys with their
//! rights. It runs on SQLite or PostgreSQL through `sqlx`, and every operation
//! touching more than one row runs in a single transaction.

mod attributes;
mod storage;
mod userdb;

#[cfg(test)]
mod test_utils;

pub use attributes::{Attributes, ExtraAttributes};

pub use storage::{DataStore, StorageError, connect_data_store, data_store_from_env};

pub use userdb::{
    ApiKey, Right, User, UserEntity, UserError, UserStore, UserWithAttributes, ValidationToken,
};
