use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::profiles::ProfileInput;
use crate::error::AppError;
use crate::models::Profile;
use crate::state::SharedState;
use crate::validation;

#[derive(Deserialize, Default, Clone)]
pub struct ProfileRequest {
    pub graduation_year: Option<i32>,
    pub degree: Option<String>,
    #[serde(default)]
    pub career_interests: Vec<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub notes: Option<String>,
}

impl ProfileRequest {
    pub fn validate(&self) -> Result<ProfileInput, AppError> {
        Ok(ProfileInput {
            graduation_year: validation::graduation_year(self.graduation_year)?,
            degree: validation::optional_text("Degree", self.degree.as_deref())?,
            career_interests: validation::career_fields(&self.career_interests)?,
            linkedin_url: validation::optional_http_url("LinkedIn URL", self.linkedin_url.as_deref())?,
            github_url: validation::optional_http_url("GitHub URL", self.github_url.as_deref())?,
            website_url: validation::optional_http_url("Website URL", self.website_url.as_deref())?,
            notes: validation::optional_text("Notes", self.notes.as_deref())?,
        })
    }
}

pub async fn get_own(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Profile>, AppError> {
    auth.require_active_member(&state).await?;
    let profile = db::profiles::find(&state.pool, &auth.email)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(profile))
}

pub async fn update_own(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    auth.require_active_member(&state).await?;
    let input = req.validate()?;
    let profile = db::profiles::upsert(&state.pool, &auth.email, &input).await?;
    Ok(Json(profile))
}

pub async fn get_by_email(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(email): Path<String>,
) -> Result<Json<Profile>, AppError> {
    auth.require_admin()?;
    let profile = db::profiles::find(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(profile))
}
