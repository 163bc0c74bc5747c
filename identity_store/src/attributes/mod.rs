//! Extra attributes layered on top of fixed-schema entities.
//!
//! Attributes are namespaced by an entity kind (for example `"user"`) and
//! stored one row per attribute name.

mod config;
mod postgres;
mod sqlite;
mod store_type;
mod types;

#[cfg(test)]
pub(crate) use config::DB_TABLE_ATTRIBUTES;
pub(crate) use store_type::AttributeStore;
pub use types::{Attributes, ExtraAttributes};
