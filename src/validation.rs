//! Input checks shared by the admin and member routes. Each helper returns the
//! normalized value or a `BadRequest` naming the offending field.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::AppError;
use crate::models::{CareerField, ExperienceLevel};

pub const MIN_PASSWORD_LEN: usize = 8;
const MAX_TEXT_LEN: usize = 200;
const MAX_NOTES_LEN: usize = 5000;

static EVM_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid regex"));

// NEAR named accounts (alice.near, team.tg) or 64-char implicit accounts.
static NEAR_ACCOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(([a-z0-9]+[-_])*[a-z0-9]+\.)*([a-z0-9]+[-_])*[a-z0-9]+$|^[0-9a-f]{64}$")
        .expect("valid regex")
});

pub fn required_text(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(value.to_string())
}

/// Trim optional free text; blank becomes `None`.
pub fn optional_text(field: &str, value: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if value.chars().count() > MAX_NOTES_LEN {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {MAX_NOTES_LEN} characters"
        )));
    }
    Ok(Some(value.to_string()))
}

/// Lowercased, trimmed email address.
pub fn email(value: &str) -> Result<String, AppError> {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }
    value
        .parse::<lettre::Address>()
        .map_err(|_| AppError::BadRequest("Invalid email address".to_string()))?;
    Ok(value)
}

pub fn password(value: &str) -> Result<(), AppError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Absolute `http`/`https` URL with a host.
pub fn http_url(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    let invalid = || AppError::BadRequest(format!("{field} must be a valid http(s) URL"));
    let parsed = Url::parse(value).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(value.to_string()),
        _ => Err(invalid()),
    }
}

pub fn optional_http_url(field: &str, value: Option<&str>) -> Result<Option<String>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => http_url(field, v).map(Some),
        None => Ok(None),
    }
}

/// Parse, dedupe and order career field tags.
pub fn career_fields(values: &[String]) -> Result<Vec<String>, AppError> {
    let mut set = BTreeSet::new();
    for value in values {
        let field = CareerField::parse(value)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown career field: {value}")))?;
        set.insert(field);
    }
    Ok(set.into_iter().map(|f| f.as_str().to_string()).collect())
}

pub fn experience_level(value: Option<&str>) -> Result<Option<String>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => ExperienceLevel::parse(v)
            .map(|l| Some(l.as_str().to_string()))
            .ok_or_else(|| AppError::BadRequest(format!("Unknown experience level: {v}"))),
        None => Ok(None),
    }
}

pub fn wallet_address(value: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    // Anything 0x-prefixed must be a full EVM address
    let near_ok = !value.starts_with("0x")
        && (2..=64).contains(&value.len())
        && NEAR_ACCOUNT.is_match(value);
    if EVM_ADDRESS.is_match(value) || near_ok {
        Ok(Some(value.to_string()))
    } else {
        Err(AppError::BadRequest("Invalid wallet address".to_string()))
    }
}

pub fn graduation_year(value: Option<i32>) -> Result<Option<i32>, AppError> {
    match value {
        Some(year) if !(1950..=2100).contains(&year) => Err(AppError::BadRequest(
            "Graduation year must be between 1950 and 2100".to_string(),
        )),
        other => Ok(other),
    }
}
