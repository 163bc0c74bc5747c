mod config;
mod postgres;
mod sqlite;
mod store_type;

pub(crate) use config::{
    DB_TABLE_API_KEY_RIGHTS, DB_TABLE_API_KEYS, DB_TABLE_USERS, DB_TABLE_VALIDATION_TOKENS,
};
pub use store_type::UserStore;
