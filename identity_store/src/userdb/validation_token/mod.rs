mod postgres;
mod sqlite;
mod types;

pub(crate) use postgres::*;
pub(crate) use sqlite::*;
pub use types::ValidationToken;
