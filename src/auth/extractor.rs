use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::auth::jwt;
use crate::db;
use crate::error::AppError;
use crate::models::Member;
use crate::state::SharedState;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }

    /// Admins always pass; everyone else needs an active, non-pending member row.
    pub async fn require_active_member(
        &self,
        state: &SharedState,
    ) -> Result<Option<Member>, AppError> {
        let member = db::members::find_by_email(&state.pool, &self.email).await?;
        if self.is_admin {
            return Ok(member);
        }
        match member {
            Some(m) if m.can_use_portal() => Ok(Some(m)),
            _ => Err(AppError::Forbidden(
                "An active membership is required".to_string(),
            )),
        }
    }

    fn from_token(token: &str, state: &SharedState) -> Result<Self, AppError> {
        let claims = jwt::decode_token(token, &state.config.supabase.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        if claims.email.is_empty() {
            return Err(AppError::Unauthorized("Token has no email".to_string()));
        }

        let email = claims.email.to_lowercase();
        Ok(AuthUser {
            user_id: claims.sub,
            is_admin: state.config.is_admin_email(&email),
            email,
        })
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        // Try Bearer token from Authorization header first
        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return AuthUser::from_token(token, state);
            }
        }

        // Try cookie-based auth
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(ACCESS_COOKIE) {
            return AuthUser::from_token(cookie.value(), state);
        }

        Err(AppError::Unauthorized(
            "Missing authentication token".to_string(),
        ))
    }
}
