use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    pub graduation_year: Option<i32>,
    pub degree: Option<String>,
    pub career_interests: Vec<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}
