use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single-use emailed token. Invites and password resets share this shape
/// and live in separate tables, selected by [`TokenKind`].
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Invite {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

pub type PasswordResetInvite = Invite;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Invite,
    PasswordReset,
}

impl TokenKind {
    pub fn table(self) -> &'static str {
        match self {
            TokenKind::Invite => "invites",
            TokenKind::PasswordReset => "password_reset_invites",
        }
    }

    /// Page the emailed link points at.
    pub fn link_path(self) -> &'static str {
        match self {
            TokenKind::Invite => "/accept-invite",
            TokenKind::PasswordReset => "/reset-password",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TokenKind::Invite => "invite",
            TokenKind::PasswordReset => "password reset",
        }
    }
}
