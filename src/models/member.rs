use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub wallet_address: Option<String>,
    pub is_active: bool,
    pub is_pending: bool,
    #[serde(skip_serializing)]
    pub auth_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn has_account(&self) -> bool {
        self.auth_user_id.is_some()
    }

    /// Pending members have been invited but have not created an account yet.
    pub fn can_use_portal(&self) -> bool {
        self.is_active && !self.is_pending
    }
}

/// Status filter for the admin member list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
    Pending,
}
