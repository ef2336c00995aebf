use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Member, MemberStatus};

pub struct MemberFields<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub wallet_address: Option<&'a str>,
}

pub async fn create(pool: &PgPool, fields: &MemberFields<'_>) -> Result<Member, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        "INSERT INTO members (first_name, last_name, email, wallet_address)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(fields.first_name)
    .bind(fields.last_name)
    .bind(fields.email)
    .bind(fields.wallet_address)
    .fetch_one(pool)
    .await
}

pub async fn list(
    pool: &PgPool,
    q: Option<&str>,
    status: Option<MemberStatus>,
) -> Result<Vec<Member>, sqlx::Error> {
    let status = status.map(|s| match s {
        MemberStatus::Active => "active",
        MemberStatus::Inactive => "inactive",
        MemberStatus::Pending => "pending",
    });

    sqlx::query_as::<_, Member>(
        "SELECT * FROM members
         WHERE ($1::text IS NULL
                OR first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1
                OR (first_name || ' ' || last_name) ILIKE $1)
           AND ($2::text IS NULL
                OR ($2 = 'active' AND is_active AND NOT is_pending)
                OR ($2 = 'inactive' AND NOT is_active AND NOT is_pending)
                OR ($2 = 'pending' AND is_pending))
         ORDER BY created_at DESC",
    )
    .bind(super::like_pattern(q))
    .bind(status)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>("SELECT * FROM members WHERE lower(email) = lower($1)")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    fields: &MemberFields<'_>,
    is_active: bool,
) -> Result<Member, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        "UPDATE members
         SET first_name = $2, last_name = $3, email = $4, wallet_address = $5, is_active = $6
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(fields.first_name)
    .bind(fields.last_name)
    .bind(fields.email)
    .bind(fields.wallet_address)
    .bind(is_active)
    .fetch_one(pool)
    .await
}

/// Link a hosted-auth account and leave the pending state.
pub async fn activate_account(
    pool: &PgPool,
    id: Uuid,
    auth_user_id: Uuid,
) -> Result<Member, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        "UPDATE members SET auth_user_id = $2, is_pending = false, is_active = true
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(auth_user_id)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM members WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
