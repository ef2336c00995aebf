//! Client for the hosted auth service (Supabase Auth / GoTrue). Accounts,
//! password hashes and sessions live there; the portal only brokers calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::SupabaseConfig;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    pub user: AuthAccount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAccount {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug)]
pub enum AuthApiError {
    InvalidCredentials,
    AlreadyRegistered,
    Rejected { status: u16, message: String },
    Transport(String),
}

impl std::fmt::Display for AuthApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthApiError::InvalidCredentials => write!(f, "invalid credentials"),
            AuthApiError::AlreadyRegistered => write!(f, "account already exists"),
            AuthApiError::Rejected { status, message } => {
                write!(f, "auth service rejected request ({status}): {message}")
            }
            AuthApiError::Transport(msg) => write!(f, "auth service unreachable: {msg}"),
        }
    }
}

impl From<AuthApiError> for AppError {
    fn from(err: AuthApiError) -> Self {
        match err {
            AuthApiError::InvalidCredentials => {
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            AuthApiError::AlreadyRegistered => {
                AppError::Conflict("An account with this email already exists".to_string())
            }
            AuthApiError::Rejected { status, message } if (400..500).contains(&status) => {
                AppError::BadRequest(message)
            }
            other => AppError::Upstream(format!("Authentication service error: {other}")),
        }
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct CreateUser<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
}

#[derive(Deserialize)]
struct UserPage {
    #[serde(default)]
    users: Vec<AuthAccount>,
}

#[derive(Serialize)]
struct UpdatePassword<'a> {
    password: &'a str,
}

pub struct SupabaseAuth {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_role_key: String,
}

impl SupabaseAuth {
    pub fn new(config: &SupabaseConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: format!("{}/auth/v1", config.url),
            anon_key: config.anon_key.clone(),
            service_role_key: config.service_role_key.clone(),
        })
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthApiError> {
        let resp = self
            .client
            .post(format!("{}/token?grant_type=password", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(|e| AuthApiError::Transport(e.to_string()))?;

        match resp.status().as_u16() {
            400 | 401 => Err(AuthApiError::InvalidCredentials),
            _ => parse_json(resp).await,
        }
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthApiError> {
        let resp = self
            .client
            .post(format!("{}/token?grant_type=refresh_token", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&RefreshGrant { refresh_token })
            .send()
            .await
            .map_err(|e| AuthApiError::Transport(e.to_string()))?;

        match resp.status().as_u16() {
            400 | 401 => Err(AuthApiError::InvalidCredentials),
            _ => parse_json(resp).await,
        }
    }

    /// Revoke the session behind `access_token`. Already-expired sessions are fine.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthApiError> {
        let resp = self
            .client
            .post(format!("{}/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthApiError::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        if resp.status().is_success() || status == 401 || status == 403 {
            return Ok(());
        }
        Err(rejection(resp).await)
    }

    /// Create a confirmed account with the given password.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthAccount, AuthApiError> {
        let resp = self
            .client
            .post(format!("{}/admin/users", self.base_url))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(&CreateUser {
                email,
                password,
                email_confirm: true,
            })
            .send()
            .await
            .map_err(|e| AuthApiError::Transport(e.to_string()))?;

        if resp.status().is_success() {
            return parse_json(resp).await;
        }
        match rejection(resp).await {
            AuthApiError::Rejected { status, message }
                if status == 422 && message.to_lowercase().contains("already") =>
            {
                Err(AuthApiError::AlreadyRegistered)
            }
            other => Err(other),
        }
    }

    /// Find an existing account by exact email through the admin user listing.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthAccount>, AuthApiError> {
        let resp = self
            .client
            .get(format!("{}/admin/users", self.base_url))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .query(&[("filter", email), ("per_page", "50")])
            .send()
            .await
            .map_err(|e| AuthApiError::Transport(e.to_string()))?;

        let page: UserPage = parse_json(resp).await?;
        Ok(page.users.into_iter().find(|account| {
            account
                .email
                .as_deref()
                .is_some_and(|e| e.eq_ignore_ascii_case(email))
        }))
    }

    pub async fn update_password(&self, user_id: Uuid, password: &str) -> Result<(), AuthApiError> {
        let resp = self
            .client
            .put(format!("{}/admin/users/{user_id}", self.base_url))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(&UpdatePassword { password })
            .send()
            .await
            .map_err(|e| AuthApiError::Transport(e.to_string()))?;

        if resp.status().is_success() {
            return Ok(());
        }
        Err(rejection(resp).await)
    }
}

async fn parse_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, AuthApiError> {
    if !resp.status().is_success() {
        return Err(rejection(resp).await);
    }
    resp.json::<T>()
        .await
        .map_err(|e| AuthApiError::Transport(format!("unexpected response body: {e}")))
}

async fn rejection(resp: reqwest::Response) -> AuthApiError {
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    AuthApiError::Rejected {
        status,
        message: error_message(&body),
    }
}

/// The auth service has used several error shapes across versions.
pub fn error_message(body: &Value) -> String {
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .unwrap_or("request rejected")
        .to_string()
}
