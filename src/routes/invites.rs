use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::extractor::AuthUser;
use crate::auth::supabase::{AuthAccount, AuthApiError};
use crate::db;
use crate::db::members::MemberFields;
use crate::error::AppError;
use crate::models::{Member, TokenKind};
use crate::routes::members::TokenIssued;
use crate::state::SharedState;
use crate::tokens::{self, TokenStatus};
use crate::validation;

#[derive(Deserialize)]
pub struct CreateInvite {
    pub email: String,
}

#[derive(Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub token: String,
}

#[derive(Serialize)]
pub struct TokenValidation {
    pub valid: bool,
    pub status: TokenStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct AcceptInvite {
    pub token: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Serialize)]
pub struct AcceptResponse {
    pub message: String,
    pub member: Member,
}

/// Shared by the invite and password reset validation endpoints.
pub async fn validate_token(
    state: &SharedState,
    kind: TokenKind,
    token: &str,
) -> Result<TokenValidation, AppError> {
    if token.trim().is_empty() {
        return Err(AppError::BadRequest("Token is required".to_string()));
    }
    let (status, invite) = tokens::validate(state, kind, token).await?;
    let valid = status == TokenStatus::Valid;
    Ok(TokenValidation {
        valid,
        status,
        email: invite.as_ref().filter(|_| valid).map(|i| i.email.clone()),
        expires_at: invite.as_ref().filter(|_| valid).map(|i| i.expires_at),
    })
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateInvite>,
) -> Result<Json<TokenIssued>, AppError> {
    auth.require_admin()?;
    let email = validation::email(&req.email)?;

    if let Some(member) = db::members::find_by_email(&state.pool, &email).await? {
        if member.has_account() {
            return Err(AppError::Conflict(
                "This email already has an account".to_string(),
            ));
        }
    }

    let invite = tokens::issue(&state, TokenKind::Invite, &email).await?;
    Ok(Json(TokenIssued {
        message: "Invite sent".to_string(),
        email: invite.email,
        expires_at: invite.expires_at,
    }))
}

pub async fn validate(
    State(state): State<SharedState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<TokenValidation>, AppError> {
    Ok(Json(validate_token(&state, TokenKind::Invite, &query.token).await?))
}

pub async fn accept(
    State(state): State<SharedState>,
    Json(req): Json<AcceptInvite>,
) -> Result<Json<AcceptResponse>, AppError> {
    validation::password(&req.password)?;
    let first_name = validation::optional_text("First name", req.first_name.as_deref())?;
    let last_name = validation::optional_text("Last name", req.last_name.as_deref())?;

    let invite = tokens::consume(&state, TokenKind::Invite, &req.token).await?;
    let existing = db::members::find_by_email(&state.pool, &invite.email).await?;

    if existing.as_ref().is_some_and(Member::has_account) {
        return Err(AppError::Conflict(
            "This email already has an account".to_string(),
        ));
    }
    if existing.is_none() && (first_name.is_none() || last_name.is_none()) {
        tokens::release(&state, TokenKind::Invite, invite.id).await;
        return Err(AppError::BadRequest(
            "First and last name are required".to_string(),
        ));
    }

    let account = match provision_account(&state, &invite.email, &req.password).await {
        Ok(account) => account,
        Err(e) => {
            tokens::release(&state, TokenKind::Invite, invite.id).await;
            return Err(e);
        }
    };

    let linked = async {
        let member = match existing {
            Some(member) => member,
            None => {
                db::members::create(
                    &state.pool,
                    &MemberFields {
                        first_name: first_name.as_deref().unwrap_or_default(),
                        last_name: last_name.as_deref().unwrap_or_default(),
                        email: &invite.email,
                        wallet_address: None,
                    },
                )
                .await?
            }
        };
        db::members::activate_account(&state.pool, member.id, account.id).await
    };
    // The account exists now; a retry adopts it
    let member = match linked.await {
        Ok(member) => member,
        Err(e) => {
            tokens::release(&state, TokenKind::Invite, invite.id).await;
            return Err(e.into());
        }
    };

    tracing::info!(member_id = %member.id, "Invite accepted");
    Ok(Json(AcceptResponse {
        message: "Account created. You can now log in.".to_string(),
        member,
    }))
}

/// Create the hosted-auth account, or adopt one left behind by a deleted member
/// or an earlier accept that failed after signup. Adopting sets the password the
/// invitee just chose.
async fn provision_account(
    state: &SharedState,
    email: &str,
    password: &str,
) -> Result<AuthAccount, AppError> {
    match state.auth.create_user(email, password).await {
        Ok(account) => Ok(account),
        Err(AuthApiError::AlreadyRegistered) => {
            let account = state.auth.find_user_by_email(email).await?.ok_or_else(|| {
                AppError::Upstream("Authentication service error: account not found".to_string())
            })?;
            state.auth.update_password(account.id, password).await?;
            tracing::info!(auth_user_id = %account.id, "Linked existing account to invite");
            Ok(account)
        }
        Err(e) => Err(e.into()),
    }
}
