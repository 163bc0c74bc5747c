use sqlx::PgConnection;

use crate::userdb::errors::UserError;
use crate::userdb::storage::DB_TABLE_VALIDATION_TOKENS;

use super::types::ValidationToken;

pub(crate) async fn save_validation_token_postgres(
    conn: &mut PgConnection,
    user_id: &str,
    token: &ValidationToken,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_VALIDATION_TOKENS.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (validation_token, user_id, created_at, expires_in)
        VALUES ($1, $2, $3, $4)
        "#
    ))
    .bind(&token.validation_token)
    .bind(user_id)
    .bind(token.created_at)
    .bind(token.expires_in)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub(crate) async fn get_validation_token_postgres(
    conn: &mut PgConnection,
    user_id: &str,
    token: &str,
) -> Result<ValidationToken, UserError> {
    let table_name = DB_TABLE_VALIDATION_TOKENS.as_str();

    sqlx::query_as::<_, ValidationToken>(&format!(
        r#"
        SELECT validation_token, created_at, expires_in FROM {table_name}
        WHERE validation_token = $1 AND user_id = $2
        "#
    ))
    .bind(token)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(UserError::ValidationTokenNotFound)
}

pub(crate) async fn delete_validation_token_postgres(
    conn: &mut PgConnection,
    user_id: &str,
    token: &str,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_VALIDATION_TOKENS.as_str();

    sqlx::query_scalar::<_, String>(&format!(
        r#"
        DELETE FROM {table_name}
        WHERE validation_token = $1 AND user_id = $2
        RETURNING validation_token
        "#
    ))
    .bind(token)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(UserError::ValidationTokenNotFound)?;

    Ok(())
}
