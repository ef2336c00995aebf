//! The single-use emailed token flow shared by invites and password resets:
//! issue (store hash, email link), validate, consume, and release on failure.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::{Invite, TokenKind};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    Valid,
    Used,
    Expired,
    Invalid,
}

/// 32 random bytes, hex encoded.
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn status_of(invite: Option<&Invite>, now: DateTime<Utc>) -> TokenStatus {
    match invite {
        None => TokenStatus::Invalid,
        Some(i) if i.used => TokenStatus::Used,
        Some(i) if i.expires_at <= now => TokenStatus::Expired,
        Some(_) => TokenStatus::Valid,
    }
}

pub fn link(base_url: &str, kind: TokenKind, token: &str) -> String {
    format!("{base_url}{}?token={token}", kind.link_path())
}

/// Store a fresh token for `email` and mail the link. If delivery fails the
/// stored row is deleted again and the caller gets a 502.
pub async fn issue(state: &AppState, kind: TokenKind, email: &str) -> Result<Invite, AppError> {
    let mailer = state.mailer.as_ref().ok_or_else(|| {
        AppError::Unavailable("Email delivery is not configured".to_string())
    })?;

    let token = generate_token();
    let expires_at = Utc::now() + Duration::hours(state.config.token_ttl_hours);
    let invite = db::tokens::create(&state.pool, kind, email, &hash_token(&token), expires_at).await?;

    let url = link(&state.config.base_url, kind, &token);
    let sent = match kind {
        TokenKind::Invite => {
            mailer
                .send_invite(email, &url, state.config.token_ttl_hours)
                .await
        }
        TokenKind::PasswordReset => {
            mailer
                .send_password_reset(email, &url, state.config.token_ttl_hours)
                .await
        }
    };

    if let Err(e) = sent {
        tracing::error!("Failed to send {} email: {e}", kind.label());
        if let Err(del) = db::tokens::delete(&state.pool, kind, invite.id).await {
            tracing::warn!("Failed to remove undelivered {} token {}: {del}", kind.label(), invite.id);
        }
        return Err(AppError::Upstream(format!(
            "Failed to send {} email",
            kind.label()
        )));
    }

    // The new link is already delivered, so a failure here only leaves older
    // links usable until they expire.
    match db::tokens::retire_others(&state.pool, kind, email, invite.id).await {
        Ok(retired) => tracing::info!(
            invite_id = %invite.id,
            retired,
            "Issued {} token",
            kind.label()
        ),
        Err(e) => tracing::warn!(
            invite_id = %invite.id,
            "Issued {} token but failed to retire older ones: {e}",
            kind.label()
        ),
    }
    Ok(invite)
}

/// Look a token up without changing it.
pub async fn validate(
    state: &AppState,
    kind: TokenKind,
    token: &str,
) -> Result<(TokenStatus, Option<Invite>), AppError> {
    let invite = db::tokens::find_by_hash(&state.pool, kind, &hash_token(token)).await?;
    let status = status_of(invite.as_ref(), Utc::now());
    Ok((status, invite))
}

/// Atomically mark a token used. Used, expired and unknown tokens are a 400.
pub async fn consume(state: &AppState, kind: TokenKind, token: &str) -> Result<Invite, AppError> {
    if token.trim().is_empty() {
        return Err(AppError::BadRequest("Token is required".to_string()));
    }
    match db::tokens::consume(&state.pool, kind, &hash_token(token)).await? {
        Some(invite) => Ok(invite),
        None => {
            let (status, _) = validate(state, kind, token).await?;
            let reason = match status {
                TokenStatus::Used => "has already been used",
                TokenStatus::Expired => "has expired",
                _ => "is invalid",
            };
            Err(AppError::BadRequest(format!(
                "This {} link {reason}",
                kind.label()
            )))
        }
    }
}

/// Undo a consumption after the follow-up action failed.
pub async fn release(state: &AppState, kind: TokenKind, id: Uuid) {
    if let Err(e) = db::tokens::release(&state.pool, kind, id).await {
        tracing::warn!("Failed to release {} token {id}: {e}", kind.label());
    } else {
        tracing::warn!("Released {} token {id} after failed follow-up", kind.label());
    }
}
