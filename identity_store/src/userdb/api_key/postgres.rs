use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::storage::duplicate_key;
use crate::userdb::errors::UserError;
use crate::userdb::storage::{DB_TABLE_API_KEY_RIGHTS, DB_TABLE_API_KEYS};

use super::types::{ApiKey, Right};

pub(crate) async fn save_api_key_postgres(
    conn: &mut PgConnection,
    user_id: &str,
    key: &ApiKey,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_API_KEYS.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (user_id, key, key_name)
        VALUES ($1, $2, $3)
        "#
    ))
    .bind(user_id)
    .bind(&key.key)
    .bind(&key.name)
    .execute(&mut *conn)
    .await
    .map_err(|e| match duplicate_key(&e) {
        Some(duplicate) if duplicate.involves("key_name") => UserError::ApiKeyNameConflict {
            name: key.name.clone(),
        },
        _ => UserError::Database(e),
    })?;

    Ok(())
}

pub(crate) async fn save_api_key_rights_postgres(
    conn: &mut PgConnection,
    key: &str,
    rights: &[Right],
) -> Result<(), UserError> {
    if rights.is_empty() {
        return Ok(());
    }

    let table_name = DB_TABLE_API_KEY_RIGHTS.as_str();

    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!(r#"INSERT INTO {table_name} (key, "right") "#));
    builder.push_values(rights, |mut row, right| {
        row.push_bind(key).push_bind(right.as_str());
    });
    builder.push(r#" ON CONFLICT (key, "right") DO NOTHING"#);

    builder.build().execute(&mut *conn).await?;

    Ok(())
}

pub(crate) async fn get_api_key_postgres(
    conn: &mut PgConnection,
    user_id: &str,
    key_name: &str,
) -> Result<ApiKey, UserError> {
    let table_name = DB_TABLE_API_KEYS.as_str();

    sqlx::query_as::<_, ApiKey>(&format!(
        r#"
        SELECT key, key_name AS name FROM {table_name}
        WHERE user_id = $1 AND key_name = $2
        "#
    ))
    .bind(user_id)
    .bind(key_name)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| UserError::ApiKeyNotFound {
        name: key_name.to_string(),
    })
}

pub(crate) async fn get_api_key_rights_postgres(
    conn: &mut PgConnection,
    key: &str,
) -> Result<Vec<Right>, UserError> {
    let table_name = DB_TABLE_API_KEY_RIGHTS.as_str();

    let rights = sqlx::query_scalar::<_, String>(&format!(
        r#"
        SELECT "right" FROM {table_name} WHERE key = $1
        "#
    ))
    .bind(key)
    .fetch_all(&mut *conn)
    .await?;

    rights.iter().map(|right| right.parse::<Right>()).collect()
}

pub(crate) async fn list_api_keys_postgres(
    conn: &mut PgConnection,
    user_id: &str,
) -> Result<Vec<ApiKey>, UserError> {
    let table_name = DB_TABLE_API_KEYS.as_str();

    let keys = sqlx::query_as::<_, ApiKey>(&format!(
        r#"
        SELECT key, key_name AS name FROM {table_name}
        WHERE user_id = $1
        ORDER BY key_name
        "#
    ))
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(keys)
}

pub(crate) async fn delete_api_key_rights_postgres(
    conn: &mut PgConnection,
    key: &str,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_API_KEY_RIGHTS.as_str();

    sqlx::query(&format!("DELETE FROM {table_name} WHERE key = $1"))
        .bind(key)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub(crate) async fn delete_api_key_postgres(
    conn: &mut PgConnection,
    user_id: &str,
    key_name: &str,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_API_KEYS.as_str();

    sqlx::query_scalar::<_, String>(&format!(
        r#"
        DELETE FROM {table_name}
        WHERE user_id = $1 AND key_name = $2
        RETURNING key
        "#
    ))
    .bind(user_id)
    .bind(key_name)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| UserError::ApiKeyNotFound {
        name: key_name.to_string(),
    })?;

    Ok(())
}
