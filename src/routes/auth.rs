use axum::extract::State;
use axum::Json;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::{ACCESS_COOKIE, AuthUser, REFRESH_COOKIE};
use crate::auth::supabase::{AuthApiError, Session};
use crate::db;
use crate::error::AppError;
use crate::models::Member;
use crate::state::SharedState;
use crate::validation;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: SessionUser,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub member: Option<Member>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn auth_cookies(session: &Session) -> CookieJar {
    let access_ttl = if session.expires_in > 0 {
        session.expires_in
    } else {
        3600
    };

    let access = Cookie::build((ACCESS_COOKIE, session.access_token.clone()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(access_ttl))
        .build();

    let refresh = Cookie::build((REFRESH_COOKIE, session.refresh_token.clone()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(30))
        .build();

    CookieJar::new().add(access).add(refresh)
}

fn clear_auth_cookies() -> CookieJar {
    let access = Cookie::build((ACCESS_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    let refresh = Cookie::build((REFRESH_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    CookieJar::new().add(access).add(refresh)
}

fn session_response(state: &SharedState, session: Session) -> (CookieJar, Json<AuthResponse>) {
    let email = session.user.email.clone().unwrap_or_default().to_lowercase();
    let jar = auth_cookies(&session);
    let body = AuthResponse {
        user: SessionUser {
            id: session.user.id,
            is_admin: state.config.is_admin_email(&email),
            email,
        },
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        expires_in: session.expires_in,
    };
    (jar, Json(body))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let email = validation::email(&req.email)?;

    if state.login_limiter.check(&email).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let session = match state.auth.sign_in(&email, &req.password).await {
        Ok(session) => session,
        Err(AuthApiError::InvalidCredentials) => {
            state.login_limiter.record_failure(&email);
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    state.login_limiter.clear(&email);
    tracing::info!(user_id = %session.user.id, "User signed in");

    Ok(session_response(&state, session))
}

pub async fn refresh(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let refresh_value = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing refresh token".to_string()))?;

    let session = state.auth.refresh(&refresh_value).await.map_err(|e| match e {
        AuthApiError::InvalidCredentials => {
            AppError::Unauthorized("Invalid or expired refresh token".to_string())
        }
        other => other.into(),
    })?;

    Ok(session_response(&state, session))
}

pub async fn logout(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(cookie) = jar.get(ACCESS_COOKIE).filter(|c| !c.value().is_empty()) {
        if let Err(e) = state.auth.sign_out(cookie.value()).await {
            tracing::warn!("Failed to revoke session on logout: {e}");
        }
    }

    (
        clear_auth_cookies(),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

pub async fn me(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<MeResponse>, AppError> {
    let member = db::members::find_by_email(&state.pool, &auth.email).await?;
    Ok(Json(MeResponse {
        id: auth.user_id,
        email: auth.email,
        is_admin: auth.is_admin,
        member,
    }))
}
