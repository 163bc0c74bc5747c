use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::storage::{StorageError, validate_sqlite_table_schema};

use super::config::DB_TABLE_ATTRIBUTES;
use super::types::Attributes;

pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), StorageError> {
    let table_name = DB_TABLE_ATTRIBUTES.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            entity_kind TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            name TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (entity_kind, entity_id, name)
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn validate_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), StorageError> {
    let table_name = DB_TABLE_ATTRIBUTES.as_str();

    let expected_columns = vec![
        ("entity_kind", "TEXT"),
        ("entity_id", "TEXT"),
        ("name", "TEXT"),
        ("value", "TEXT"),
    ];

    validate_sqlite_table_schema(pool, table_name, &expected_columns, StorageError::Storage).await
}

pub(super) async fn load_attributes_sqlite(
    conn: &mut SqliteConnection,
    entity_kind: &str,
    entity_id: &str,
) -> Result<Attributes, StorageError> {
    let table_name = DB_TABLE_ATTRIBUTES.as_str();

    let rows = sqlx::query_as::<_, (String, String)>(&format!(
        r#"
        SELECT name, value FROM {table_name}
        WHERE entity_kind = ? AND entity_id = ?
        "#
    ))
    .bind(entity_kind)
    .bind(entity_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter()
        .map(|(name, value)| -> Result<_, StorageError> {
            Ok((name, serde_json::from_str(&value)?))
        })
        .collect()
}

pub(super) async fn insert_attribute_sqlite(
    conn: &mut SqliteConnection,
    entity_kind: &str,
    entity_id: &str,
    name: &str,
    value: &serde_json::Value,
) -> Result<(), StorageError> {
    let table_name = DB_TABLE_ATTRIBUTES.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (entity_kind, entity_id, name, value)
        VALUES (?, ?, ?, ?)
        "#
    ))
    .bind(entity_kind)
    .bind(entity_id)
    .bind(name)
    .bind(serde_json::to_string(value)?)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub(super) async fn update_attribute_sqlite(
    conn: &mut SqliteConnection,
    entity_kind: &str,
    entity_id: &str,
    name: &str,
    value: &serde_json::Value,
) -> Result<(), StorageError> {
    let table_name = DB_TABLE_ATTRIBUTES.as_str();

    sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET value = ?
        WHERE entity_kind = ? AND entity_id = ? AND name = ?
        "#
    ))
    .bind(serde_json::to_string(value)?)
    .bind(entity_kind)
    .bind(entity_id)
    .bind(name)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub(super) async fn delete_attribute_sqlite(
    conn: &mut SqliteConnection,
    entity_kind: &str,
    entity_id: &str,
    name: &str,
) -> Result<(), StorageError> {
    let table_name = DB_TABLE_ATTRIBUTES.as_str();

    sqlx::query(&format!(
        r#"
        DELETE FROM {table_name}
        WHERE entity_kind = ? AND entity_id = ? AND name = ?
        "#
    ))
    .bind(entity_kind)
    .bind(entity_id)
    .bind(name)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
