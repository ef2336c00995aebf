use sqlx::PgPool;

use crate::models::Profile;

#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub graduation_year: Option<i32>,
    pub degree: Option<String>,
    pub career_interests: Vec<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub notes: Option<String>,
}

pub async fn find(pool: &PgPool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE email = lower($1)")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn upsert(
    pool: &PgPool,
    email: &str,
    input: &ProfileInput,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles (email, graduation_year, degree, career_interests,
                               linkedin_url, github_url, website_url, notes)
         VALUES (lower($1), $2, $3, $4, $5, $6, $7, $8)
         ON CONFLICT (email) DO UPDATE
         SET graduation_year = EXCLUDED.graduation_year,
             degree = EXCLUDED.degree,
             career_interests = EXCLUDED.career_interests,
             linkedin_url = EXCLUDED.linkedin_url,
             github_url = EXCLUDED.github_url,
             website_url = EXCLUDED.website_url,
             notes = EXCLUDED.notes,
             updated_at = now()
         RETURNING *",
    )
    .bind(email)
    .bind(input.graduation_year)
    .bind(input.degree.as_deref())
    .bind(&input.career_interests)
    .bind(input.linkedin_url.as_deref())
    .bind(input.github_url.as_deref())
    .bind(input.website_url.as_deref())
    .bind(input.notes.as_deref())
    .fetch_one(pool)
    .await
}
