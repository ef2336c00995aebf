use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Invite, TokenKind};

pub async fn create(
    pool: &PgPool,
    kind: TokenKind,
    email: &str,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<Invite, sqlx::Error> {
    let sql = format!(
        "INSERT INTO {} (email, token_hash, expires_at) VALUES ($1, $2, $3) RETURNING *",
        kind.table()
    );
    sqlx::query_as::<_, Invite>(&sql)
        .bind(email)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(pool)
        .await
}

/// Lookup regardless of state; callers decide whether the token is still usable.
pub async fn find_by_hash(
    pool: &PgPool,
    kind: TokenKind,
    token_hash: &str,
) -> Result<Option<Invite>, sqlx::Error> {
    let sql = format!("SELECT * FROM {} WHERE token_hash = $1", kind.table());
    sqlx::query_as::<_, Invite>(&sql)
        .bind(token_hash)
        .fetch_optional(pool)
        .await
}

/// Mark a valid token used and return it. Validation and consumption happen in
/// one statement, so at most one caller gets `Some` for a given token.
pub async fn consume(
    pool: &PgPool,
    kind: TokenKind,
    token_hash: &str,
) -> Result<Option<Invite>, sqlx::Error> {
    let sql = format!(
        "UPDATE {} SET used = true
         WHERE token_hash = $1 AND used = false AND expires_at > now()
         RETURNING *",
        kind.table()
    );
    sqlx::query_as::<_, Invite>(&sql)
        .bind(token_hash)
        .fetch_optional(pool)
        .await
}

pub async fn release(pool: &PgPool, kind: TokenKind, id: Uuid) -> Result<(), sqlx::Error> {
    let sql = format!("UPDATE {} SET used = false WHERE id = $1", kind.table());
    sqlx::query(&sql).bind(id).execute(pool).await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, kind: TokenKind, id: Uuid) -> Result<(), sqlx::Error> {
    let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
    sqlx::query(&sql).bind(id).execute(pool).await?;
    Ok(())
}

/// Retire every other outstanding token for `email`, keeping `keep`.
pub async fn retire_others(
    pool: &PgPool,
    kind: TokenKind,
    email: &str,
    keep: Uuid,
) -> Result<u64, sqlx::Error> {
    let sql = format!(
        "UPDATE {} SET used = true
         WHERE lower(email) = lower($1) AND id <> $2 AND used = false",
        kind.table()
    );
    let result = sqlx::query(&sql).bind(email).bind(keep).execute(pool).await?;
    Ok(result.rows_affected())
}
