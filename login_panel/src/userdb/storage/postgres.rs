use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::userdb::{
    errors::UserError,
    types::{UserPatch, UserRecord},
};

use super::config::DB_TABLE_USERS;

// PostgreSQL implementations
pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            sequence_number BIGSERIAL PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            enterprise TEXT NOT NULL,
            position TEXT NOT NULL,
            permission TEXT NOT NULL,
            exception TEXT NOT NULL,
            authorization_code TEXT NOT NULL,
            password_digest TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn find_user_by_email_postgres(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<Option<UserRecord>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    Ok(sqlx::query_as::<_, UserRecord>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE email = $1
        "#
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?)
}

pub(super) async fn insert_user_postgres(
    pool: &Pool<Postgres>,
    user: &UserRecord,
) -> Result<bool, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    // The UNIQUE constraint decides races between concurrent registrations
    let result = sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (
            email, name, enterprise, position, permission, exception,
            authorization_code, password_digest, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (email) DO NOTHING
        "#
    ))
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.enterprise)
    .bind(&user.position)
    .bind(&user.permission)
    .bind(&user.exception)
    .bind(&user.authorization_code)
    .bind(&user.password_digest)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub(super) async fn update_user_postgres(
    pool: &Pool<Postgres>,
    email: &str,
    patch: &UserPatch,
) -> Result<bool, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let result = sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET
            name = COALESCE($1, name),
            enterprise = COALESCE($2, enterprise),
            position = COALESCE($3, position),
            permission = COALESCE($4, permission),
            exception = COALESCE($5, exception),
            authorization_code = COALESCE($6, authorization_code),
            password_digest = COALESCE($7, password_digest),
            updated_at = $8
        WHERE email = $9
        "#
    ))
    .bind(&patch.name)
    .bind(&patch.enterprise)
    .bind(&patch.position)
    .bind(&patch.permission)
    .bind(&patch.exception)
    .bind(&patch.authorization_code)
    .bind(&patch.password_digest)
    .bind(Utc::now())
    .bind(email)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub(super) async fn delete_user_postgres(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<bool, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let result = sqlx::query(&format!(
        r#"
        DELETE FROM {table_name} WHERE email = $1
        "#
    ))
    .bind(email)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
