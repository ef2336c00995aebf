use askama::Template;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth::extractor::ACCESS_COOKIE;
use crate::auth::jwt;
use crate::models::TokenKind;
use crate::state::SharedState;
use crate::tokens::{self, TokenStatus};

#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    signed_in: bool,
}

#[derive(Template)]
#[template(path = "auth/forgot_password.html")]
struct ForgotPasswordTemplate {
    signed_in: bool,
}

#[derive(Template)]
#[template(path = "auth/accept_invite.html")]
struct AcceptInviteTemplate {
    signed_in: bool,
    token: String,
    email: String,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/reset_password.html")]
struct ResetPasswordTemplate {
    signed_in: bool,
    token: String,
    error: Option<String>,
}

#[derive(Deserialize)]
pub struct TokenParams {
    pub token: Option<String>,
}

pub async fn login_page(State(state): State<SharedState>, jar: CookieJar) -> Response {
    // If already logged in, go straight to the job board
    if let Some(cookie) = jar.get(ACCESS_COOKIE) {
        if jwt::decode_token(cookie.value(), &state.config.supabase.jwt_secret).is_ok() {
            return Redirect::to("/careers").into_response();
        }
    }

    let template = LoginTemplate { signed_in: false };
    Html(template.render().unwrap_or_default()).into_response()
}

pub async fn forgot_password_page() -> impl IntoResponse {
    let template = ForgotPasswordTemplate { signed_in: false };
    Html(template.render().unwrap_or_default())
}

/// Human-readable reason a token page cannot be used.
fn token_error(status: TokenStatus, kind: TokenKind) -> Option<String> {
    match status {
        TokenStatus::Valid => None,
        TokenStatus::Used => Some(format!("This {} link has already been used.", kind.label())),
        TokenStatus::Expired => Some(format!("This {} link has expired.", kind.label())),
        TokenStatus::Invalid => Some(format!("This {} link is not valid.", kind.label())),
    }
}

async fn check_token(
    state: &SharedState,
    kind: TokenKind,
    token: &str,
) -> (Option<String>, String) {
    if token.is_empty() {
        return (token_error(TokenStatus::Invalid, kind), String::new());
    }
    match tokens::validate(state, kind, token).await {
        Ok((status, invite)) => (
            token_error(status, kind),
            invite.map(|i| i.email).unwrap_or_default(),
        ),
        Err(e) => {
            tracing::error!("Token page lookup failed: {e}");
            (
                Some("Something went wrong. Please try again later.".to_string()),
                String::new(),
            )
        }
    }
}

pub async fn accept_invite_page(
    State(state): State<SharedState>,
    Query(q): Query<TokenParams>,
) -> impl IntoResponse {
    let token = q.token.unwrap_or_default();
    let (error, email) = check_token(&state, TokenKind::Invite, &token).await;
    let template = AcceptInviteTemplate {
        signed_in: false,
        email: if error.is_none() { email } else { String::new() },
        token,
        error,
    };
    Html(template.render().unwrap_or_default())
}

pub async fn reset_password_page(
    State(state): State<SharedState>,
    Query(q): Query<TokenParams>,
) -> impl IntoResponse {
    let token = q.token.unwrap_or_default();
    let (error, _) = check_token(&state, TokenKind::PasswordReset, &token).await;
    let template = ResetPasswordTemplate {
        signed_in: false,
        token,
        error,
    };
    Html(template.render().unwrap_or_default())
}
