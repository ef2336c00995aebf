use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::members::MemberFields;
use crate::error::{AppError, conflict_on_unique};
use crate::models::{Member, MemberStatus, TokenKind};
use crate::state::SharedState;
use crate::tokens;
use crate::validation;

const DUPLICATE_EMAIL: &str = "A member with this email already exists";

#[derive(Deserialize)]
pub struct MemberQuery {
    pub q: Option<String>,
    pub status: Option<MemberStatus>,
}

#[derive(Deserialize)]
pub struct CreateMember {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub wallet_address: Option<String>,
}

/// Every field is optional; omitted fields keep their current value.
#[derive(Deserialize)]
pub struct UpdateMember {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
pub struct TokenIssued {
    pub message: String,
    pub email: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<MemberQuery>,
) -> Result<Json<Vec<Member>>, AppError> {
    auth.require_admin()?;
    let members = db::members::list(&state.pool, query.q.as_deref(), query.status).await?;
    Ok(Json(members))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateMember>,
) -> Result<Json<Member>, AppError> {
    auth.require_admin()?;

    let first_name = validation::required_text("First name", &req.first_name)?;
    let last_name = validation::required_text("Last name", &req.last_name)?;
    let email = validation::email(&req.email)?;
    let wallet_address = validation::wallet_address(req.wallet_address.as_deref())?;

    let member = db::members::create(
        &state.pool,
        &MemberFields {
            first_name: &first_name,
            last_name: &last_name,
            email: &email,
            wallet_address: wallet_address.as_deref(),
        },
    )
    .await
    .map_err(conflict_on_unique(DUPLICATE_EMAIL))?;

    tracing::info!(member_id = %member.id, admin = %auth.email, "Member created");
    Ok(Json(member))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Member>, AppError> {
    auth.require_admin()?;
    let member = find(&state, id).await?;
    Ok(Json(member))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMember>,
) -> Result<Json<Member>, AppError> {
    auth.require_admin()?;
    let current = find(&state, id).await?;
    let current_email = current.email.clone();

    let first_name = match req.first_name {
        Some(v) => validation::required_text("First name", &v)?,
        None => current.first_name,
    };
    let last_name = match req.last_name {
        Some(v) => validation::required_text("Last name", &v)?,
        None => current.last_name,
    };
    let email = match req.email {
        Some(v) => validation::email(&v)?,
        None => current.email,
    };
    if current.auth_user_id.is_some() && !email.eq_ignore_ascii_case(&current_email) {
        return Err(AppError::BadRequest(
            "Email cannot be changed once the member has an account".to_string(),
        ));
    }
    let wallet_address = match req.wallet_address {
        Some(v) => validation::wallet_address(Some(&v))?,
        None => current.wallet_address,
    };
    let is_active = req.is_active.unwrap_or(current.is_active);

    let member = db::members::update(
        &state.pool,
        id,
        &MemberFields {
            first_name: &first_name,
            last_name: &last_name,
            email: &email,
            wallet_address: wallet_address.as_deref(),
        },
        is_active,
    )
    .await
    .map_err(conflict_on_unique(DUPLICATE_EMAIL))?;

    tracing::info!(member_id = %member.id, is_active, admin = %auth.email, "Member updated");
    Ok(Json(member))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    if !db::members::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("Member not found".to_string()));
    }

    tracing::info!(member_id = %id, admin = %auth.email, "Member deleted");
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

/// (Re-)send the account invite for a member that has no account yet.
pub async fn send_invite(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TokenIssued>, AppError> {
    auth.require_admin()?;
    let member = find(&state, id).await?;

    if member.has_account() {
        return Err(AppError::Conflict(
            "This member already has an account".to_string(),
        ));
    }

    let invite = tokens::issue(&state, TokenKind::Invite, &member.email).await?;
    Ok(Json(TokenIssued {
        message: "Invite sent".to_string(),
        email: invite.email,
        expires_at: invite.expires_at,
    }))
}

pub async fn send_password_reset(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TokenIssued>, AppError> {
    auth.require_admin()?;
    let member = find(&state, id).await?;

    if !member.has_account() {
        return Err(AppError::BadRequest(
            "This member has not created an account yet".to_string(),
        ));
    }

    let invite = tokens::issue(&state, TokenKind::PasswordReset, &member.email).await?;
    Ok(Json(TokenIssued {
        message: "Password reset email sent".to_string(),
        email: invite.email,
        expires_at: invite.expires_at,
    }))
}

async fn find(state: &SharedState, id: Uuid) -> Result<Member, AppError> {
    db::members::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found".to_string()))
}
