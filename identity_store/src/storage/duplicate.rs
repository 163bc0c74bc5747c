//! Classification of unique-constraint violations.
//!
//! Both backends report which columns collided, in different shapes:
//! PostgreSQL in the error detail (`Key (email)=(a@b.c) already exists.`),
//! SQLite in the message (`UNIQUE constraint failed: ids_users.email`).

use sqlx::postgres::PgDatabaseError;

/// The columns named by a unique-constraint violation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DuplicateKey {
    columns: Vec<String>,
}

impl DuplicateKey {
    pub(crate) fn involves(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Returns `Some` when `err` is a unique-constraint violation.
pub(crate) fn duplicate_key(err: &sqlx::Error) -> Option<DuplicateKey> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if !db_err.is_unique_violation() {
        return None;
    }

    let columns = match db_err.try_downcast_ref::<PgDatabaseError>() {
        Some(pg_err) => pg_err
            .detail()
            .map(columns_from_postgres_detail)
            .unwrap_or_default(),
        None => columns_from_sqlite_message(db_err.message()),
    };

    tracing::debug!(?columns, "Unique constraint violation");

    Some(DuplicateKey { columns })
}

fn columns_from_postgres_detail(detail: &str) -> Vec<String> {
    detail
        .strip_prefix("Key (")
        .and_then(|rest| rest.split_once(")=("))
        .map(|(columns, _)| split_columns(columns))
        .unwrap_or_default()
}

fn columns_from_sqlite_message(message: &str) -> Vec<String> {
    message
        .split_once("constraint failed: ")
        .map(|(_, columns)| split_columns(columns))
        .unwrap_or_default()
}

// Strips table qualifiers and identifier quotes.
fn split_columns(columns: &str) -> Vec<String> {
    columns
        .split(',')
        .map(|column| {
            let column = column.trim();
            let column = column.rsplit_once('.').map_or(column, |(_, name)| name);
            column.trim_matches('"').to_string()
        })
        .filter(|column| !column.is_empty())
        .collect()
}
