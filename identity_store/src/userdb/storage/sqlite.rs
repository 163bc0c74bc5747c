use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::storage::{duplicate_key, validate_sqlite_table_schema};
use crate::userdb::{
    errors::UserError,
    types::{User, UserSearchField},
};

use super::config::{
    DB_TABLE_API_KEY_RIGHTS, DB_TABLE_API_KEYS, DB_TABLE_USERS, DB_TABLE_VALIDATION_TOKENS,
};

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();
    let tokens_table = DB_TABLE_VALIDATION_TOKENS.as_str();
    let keys_table = DB_TABLE_API_KEYS.as_str();
    let rights_table = DB_TABLE_API_KEY_RIGHTS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {users_table} (
            user_id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            validated_at TIMESTAMP,
            admin BOOLEAN NOT NULL DEFAULT false,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {tokens_table} (
            validation_token TEXT NOT NULL,
            user_id TEXT NOT NULL REFERENCES {users_table}(user_id),
            created_at TIMESTAMP NOT NULL,
            expires_in INTEGER NOT NULL,
            PRIMARY KEY (validation_token, user_id)
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {keys_table} (
            key TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL REFERENCES {users_table}(user_id),
            key_name TEXT NOT NULL,
            UNIQUE (user_id, key_name)
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {rights_table} (
            key TEXT NOT NULL REFERENCES {keys_table}(key),
            "right" TEXT NOT NULL,
            PRIMARY KEY (key, "right")
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

/// Validates that the user tables match what we expect
pub(super) async fn validate_user_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let users_columns = vec![
        ("user_id", "TEXT"),
        ("name", "TEXT"),
        ("email", "TEXT"),
        ("password", "TEXT"),
        ("validated_at", "TIMESTAMP"),
        ("admin", "BOOLEAN"),
        ("created_at", "TIMESTAMP"),
        ("updated_at", "TIMESTAMP"),
    ];
    let tokens_columns = vec![
        ("validation_token", "TEXT"),
        ("user_id", "TEXT"),
        ("created_at", "TIMESTAMP"),
        ("expires_in", "INTEGER"),
    ];
    let keys_columns = vec![("key", "TEXT"), ("user_id", "TEXT"), ("key_name", "TEXT")];
    let rights_columns = vec![("key", "TEXT"), ("right", "TEXT")];

    for (table_name, columns) in [
        (DB_TABLE_USERS.as_str(), &users_columns),
        (DB_TABLE_VALIDATION_TOKENS.as_str(), &tokens_columns),
        (DB_TABLE_API_KEYS.as_str(), &keys_columns),
        (DB_TABLE_API_KEY_RIGHTS.as_str(), &rights_columns),
    ] {
        validate_sqlite_table_schema(pool, table_name, columns, UserError::Storage).await?;
    }

    Ok(())
}

pub(super) async fn create_user_sqlite(
    conn: &mut SqliteConnection,
    user: &User,
    now: DateTime<Utc>,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();
    let user_id = user.user_id.to_lowercase();
    let email = user.email.to_lowercase();

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name}
        (user_id, name, email, password, validated_at, admin, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#
    ))
    .bind(&user_id)
    .bind(&user.name)
    .bind(&email)
    .bind(&user.password)
    .bind(user.validated_at)
    .bind(user.admin)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(|e| match duplicate_key(&e) {
        Some(duplicate) if duplicate.involves("email") => UserError::UserEmailTaken {
            email: email.clone(),
        },
        Some(duplicate) if duplicate.involves("user_id") => UserError::UserIdTaken {
            user_id: user_id.clone(),
        },
        _ => UserError::Database(e),
    })?;

    Ok(())
}

pub(super) async fn get_user_by_field_sqlite(
    conn: &mut SqliteConnection,
    field: &UserSearchField,
) -> Result<Option<User>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let (column, value) = match field {
        UserSearchField::Id(id) => ("user_id", id),
        UserSearchField::Email(email) => ("email", email),
    };

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT user_id, name, email, password, validated_at, admin, created_at, updated_at
        FROM {table_name} WHERE {column} = ?
        "#
    ))
    .bind(value)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(user)
}

pub(super) async fn update_user_sqlite(
    conn: &mut SqliteConnection,
    user: &User,
    now: DateTime<Utc>,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();
    let user_id = user.user_id.to_lowercase();
    let email = user.email.to_lowercase();

    let result = sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET
            name = ?,
            email = ?,
            validated_at = ?,
            password = ?,
            admin = ?,
            updated_at = ?
        WHERE user_id = ?
        "#
    ))
    .bind(&user.name)
    .bind(&email)
    .bind(user.validated_at)
    .bind(&user.password)
    .bind(user.admin)
    .bind(now)
    .bind(&user_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| match duplicate_key(&e) {
        Some(_) => UserError::UserEmailTaken {
            email: email.clone(),
        },
        None => UserError::Database(e),
    })?;

    if result.rows_affected() == 0 {
        return Err(UserError::UserNotFound { user_id });
    }

    Ok(())
}
