use askama::Template;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{CareerField, ExperienceLevel, Job};
use crate::routes::jobs::JobQuery;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "portal/careers.html")]
struct CareersTemplate {
    signed_in: bool,
    is_admin: bool,
    q: String,
    selected_field: String,
    selected_level: String,
    referral_only: bool,
    fields: Vec<Choice>,
    levels: Vec<Choice>,
    jobs: Vec<JobCard>,
}

pub(crate) struct Choice {
    pub value: &'static str,
    pub label: String,
}

pub(crate) struct JobCard {
    pub company: String,
    pub position: String,
    pub url: String,
    pub level: String,
    pub fields: Vec<String>,
    pub referral: bool,
    pub active: bool,
    pub notes: String,
    pub updated: String,
}

/// `software_engineering` -> `Software Engineering`
pub(crate) fn humanize(tag: &str) -> String {
    tag.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn job_card(job: &Job) -> JobCard {
    JobCard {
        company: job.company.clone(),
        position: job.position.clone(),
        url: job.job_posting_url.clone(),
        level: job.experience_level.as_deref().map(humanize).unwrap_or_default(),
        fields: job.career_fields.iter().map(|f| humanize(f)).collect(),
        referral: job.referral_available,
        active: job.is_active,
        notes: job.notes.clone().unwrap_or_default(),
        updated: job.last_updated.format("%Y-%m-%d").to_string(),
    }
}

pub async fn index(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<JobQuery>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_active_member(&state).await?;

    let q = query.q.clone().unwrap_or_default();
    let selected_field = query.career_field.clone().unwrap_or_default();
    let selected_level = query.experience_level.clone().unwrap_or_default();
    let referral_only = query.referral == Some(true);

    let filter = query.into_filter(auth.is_admin)?;
    let jobs = db::jobs::list(&state.pool, &filter).await?;

    let template = CareersTemplate {
        signed_in: true,
        is_admin: auth.is_admin,
        q,
        selected_field,
        selected_level,
        referral_only,
        fields: CareerField::ALL
            .iter()
            .map(|f| Choice {
                value: f.as_str(),
                label: humanize(f.as_str()),
            })
            .collect(),
        levels: ExperienceLevel::ALL
            .iter()
            .map(|l| Choice {
                value: l.as_str(),
                label: humanize(l.as_str()),
            })
            .collect(),
        jobs: jobs.iter().map(job_card).collect(),
    };
    Ok(Html(template.render().unwrap_or_default()))
}
