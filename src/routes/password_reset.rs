use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::db;
use crate::error::AppError;
use crate::middleware::client_ip::ClientIp;
use crate::models::TokenKind;
use crate::routes::auth::MessageResponse;
use crate::routes::invites::{TokenQuery, TokenValidation, validate_token};
use crate::state::SharedState;
use crate::tokens;
use crate::validation;

#[derive(Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ConfirmReset {
    pub token: String,
    pub password: String,
}

pub async fn request(
    State(state): State<SharedState>,
    ClientIp(ip): ClientIp,
    Json(req): Json<ResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if state.reset_limiter.check(ip).is_err() {
        return Err(AppError::RateLimited(
            "Too many reset requests. Please try again later.".to_string(),
        ));
    }
    let email = validation::email(&req.email)?;

    // Always return 200 to not reveal whether email exists
    let response = Json(MessageResponse {
        message: "If that email belongs to a member, a reset link has been sent.".to_string(),
    });

    let state = state.clone();
    tokio::spawn(async move {
        match db::members::find_by_email(&state.pool, &email).await {
            Ok(Some(member)) if member.has_account() && member.is_active => {
                if let Err(e) = tokens::issue(&state, TokenKind::PasswordReset, &member.email).await {
                    tracing::error!("Password reset request failed: {e}");
                }
            }
            Ok(_) => tracing::debug!("Password reset requested for unknown or inactive email"),
            Err(e) => tracing::error!("Password reset lookup failed: {e}"),
        }
    });

    Ok(response)
}

pub async fn validate(
    State(state): State<SharedState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<TokenValidation>, AppError> {
    Ok(Json(
        validate_token(&state, TokenKind::PasswordReset, &query.token).await?,
    ))
}

pub async fn confirm(
    State(state): State<SharedState>,
    Json(req): Json<ConfirmReset>,
) -> Result<Json<MessageResponse>, AppError> {
    validation::password(&req.password)?;

    let reset = tokens::consume(&state, TokenKind::PasswordReset, &req.token).await?;

    let auth_user_id = db::members::find_by_email(&state.pool, &reset.email)
        .await?
        .and_then(|m| m.auth_user_id)
        .ok_or_else(|| AppError::BadRequest("No account exists for this email".to_string()))?;

    if let Err(e) = state.auth.update_password(auth_user_id, &req.password).await {
        tokens::release(&state, TokenKind::PasswordReset, reset.id).await;
        return Err(e.into());
    }

    tracing::info!(%auth_user_id, "Password reset completed");
    Ok(Json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}
