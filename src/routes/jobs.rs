use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::jobs::{JobFilter, JobInput};
use crate::error::AppError;
use crate::models::{CareerField, ExperienceLevel, Job};
use crate::state::SharedState;
use crate::validation;

#[derive(Deserialize, Default)]
pub struct JobQuery {
    pub q: Option<String>,
    pub career_field: Option<String>,
    pub experience_level: Option<String>,
    pub referral: Option<bool>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Deserialize, Clone)]
pub struct JobRequest {
    pub company: String,
    pub position: String,
    pub job_posting_url: String,
    pub experience_level: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub career_fields: Vec<String>,
    #[serde(default)]
    pub referral_available: bool,
    pub is_active: Option<bool>,
}

impl JobRequest {
    pub fn validate(&self) -> Result<JobInput, AppError> {
        Ok(JobInput {
            company: validation::required_text("Company", &self.company)?,
            position: validation::required_text("Position", &self.position)?,
            job_posting_url: validation::http_url("Job posting URL", &self.job_posting_url)?,
            experience_level: validation::experience_level(self.experience_level.as_deref())?,
            notes: validation::optional_text("Notes", self.notes.as_deref())?,
            career_fields: validation::career_fields(&self.career_fields)?,
            referral_available: self.referral_available,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

impl JobQuery {
    /// Resolve query parameters into a filter. Only admins may see inactive postings.
    pub fn into_filter(self, is_admin: bool) -> Result<JobFilter, AppError> {
        let career_field = match self.career_field.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Some(
                CareerField::parse(v)
                    .ok_or_else(|| AppError::BadRequest(format!("Unknown career field: {v}")))?
                    .as_str()
                    .to_string(),
            ),
            _ => None,
        };
        let experience_level = match self.experience_level.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Some(
                ExperienceLevel::parse(v)
                    .ok_or_else(|| AppError::BadRequest(format!("Unknown experience level: {v}")))?
                    .as_str()
                    .to_string(),
            ),
            _ => None,
        };

        Ok(JobFilter {
            q: self.q,
            career_field,
            experience_level,
            referral_available: self.referral,
            include_inactive: is_admin && self.include_inactive,
        })
    }
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<Vec<Job>>, AppError> {
    auth.require_active_member(&state).await?;
    let filter = query.into_filter(auth.is_admin)?;
    let jobs = db::jobs::list(&state.pool, &filter).await?;
    Ok(Json(jobs))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    auth.require_active_member(&state).await?;
    let job = db::jobs::find_by_id(&state.pool, id, auth.is_admin)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(job))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<JobRequest>,
) -> Result<Json<Job>, AppError> {
    auth.require_admin()?;
    let input = req.validate()?;

    let job = db::jobs::create(&state.pool, &input).await?;

    tracing::info!(job_id = %job.id, admin = %auth.email, "Job created");
    Ok(Json(job))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<JobRequest>,
) -> Result<Json<Job>, AppError> {
    auth.require_admin()?;
    let input = req.validate()?;

    let job = db::jobs::update(&state.pool, id, &input)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Job not found".to_string()),
            _ => AppError::Database(e),
        })?;

    tracing::info!(job_id = %job.id, admin = %auth.email, "Job updated");
    Ok(Json(job))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    if !db::jobs::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    tracing::info!(job_id = %id, admin = %auth.email, "Job deleted");
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}
