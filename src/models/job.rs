use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub job_posting_url: String,
    pub experience_level: Option<String>,
    pub notes: Option<String>,
    pub career_fields: Vec<String>,
    pub referral_available: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerField {
    SoftwareEngineering,
    DataScience,
    ProductManagement,
    Design,
    Blockchain,
    Research,
    Consulting,
    Finance,
    Marketing,
    Operations,
}

impl CareerField {
    pub const ALL: [CareerField; 10] = [
        CareerField::SoftwareEngineering,
        CareerField::DataScience,
        CareerField::ProductManagement,
        CareerField::Design,
        CareerField::Blockchain,
        CareerField::Research,
        CareerField::Consulting,
        CareerField::Finance,
        CareerField::Marketing,
        CareerField::Operations,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CareerField::SoftwareEngineering => "software_engineering",
            CareerField::DataScience => "data_science",
            CareerField::ProductManagement => "product_management",
            CareerField::Design => "design",
            CareerField::Blockchain => "blockchain",
            CareerField::Research => "research",
            CareerField::Consulting => "consulting",
            CareerField::Finance => "finance",
            CareerField::Marketing => "marketing",
            CareerField::Operations => "operations",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Internship,
    NewGrad,
    EntryLevel,
    MidLevel,
    Senior,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 5] = [
        ExperienceLevel::Internship,
        ExperienceLevel::NewGrad,
        ExperienceLevel::EntryLevel,
        ExperienceLevel::MidLevel,
        ExperienceLevel::Senior,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Internship => "internship",
            ExperienceLevel::NewGrad => "new_grad",
            ExperienceLevel::EntryLevel => "entry_level",
            ExperienceLevel::MidLevel => "mid_level",
            ExperienceLevel::Senior => "senior",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|l| l.as_str() == s)
    }
}
