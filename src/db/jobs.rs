use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Job;

/// Validated job fields, shared by create and update.
#[derive(Debug, Clone)]
pub struct JobInput {
    pub company: String,
    pub position: String,
    pub job_posting_url: String,
    pub experience_level: Option<String>,
    pub notes: Option<String>,
    pub career_fields: Vec<String>,
    pub referral_available: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub q: Option<String>,
    pub career_field: Option<String>,
    pub experience_level: Option<String>,
    pub referral_available: Option<bool>,
    pub include_inactive: bool,
}

pub async fn list(pool: &PgPool, filter: &JobFilter) -> Result<Vec<Job>, sqlx::Error> {
    sqlx::query_as::<_, Job>(
        "SELECT * FROM jobs
         WHERE ($1 OR is_active)
           AND ($2::text IS NULL OR company ILIKE $2 OR position ILIKE $2)
           AND ($3::text IS NULL OR $3 = ANY(career_fields))
           AND ($4::text IS NULL OR experience_level = $4)
           AND ($5::bool IS NULL OR referral_available = $5)
         ORDER BY created_at DESC",
    )
    .bind(filter.include_inactive)
    .bind(super::like_pattern(filter.q.as_deref()))
    .bind(filter.career_field.as_deref())
    .bind(filter.experience_level.as_deref())
    .bind(filter.referral_available)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
    include_inactive: bool,
) -> Result<Option<Job>, sqlx::Error> {
    sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1 AND ($2 OR is_active)")
        .bind(id)
        .bind(include_inactive)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, input: &JobInput) -> Result<Job, sqlx::Error> {
    sqlx::query_as::<_, Job>(
        "INSERT INTO jobs (company, position, job_posting_url, experience_level, notes,
                           career_fields, referral_available, is_active)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(&input.company)
    .bind(&input.position)
    .bind(&input.job_posting_url)
    .bind(input.experience_level.as_deref())
    .bind(input.notes.as_deref())
    .bind(&input.career_fields)
    .bind(input.referral_available)
    .bind(input.is_active)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: Uuid, input: &JobInput) -> Result<Job, sqlx::Error> {
    sqlx::query_as::<_, Job>(
        "UPDATE jobs
         SET company = $2, position = $3, job_posting_url = $4, experience_level = $5,
             notes = $6, career_fields = $7, referral_available = $8, is_active = $9,
             last_updated = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&input.company)
    .bind(&input.position)
    .bind(&input.job_posting_url)
    .bind(input.experience_level.as_deref())
    .bind(input.notes.as_deref())
    .bind(&input.career_fields)
    .bind(input.referral_available)
    .bind(input.is_active)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
