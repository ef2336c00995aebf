use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::jobs::JobFilter;
use crate::error::AppError;
use crate::models::Member;
use crate::state::SharedState;
use crate::views::careers::{JobCard, job_card};

#[derive(Template)]
#[template(path = "portal/admin.html")]
struct AdminTemplate {
    signed_in: bool,
    email_enabled: bool,
    members: Vec<MemberRow>,
    jobs: Vec<AdminJobRow>,
}

struct MemberRow {
    id: String,
    name: String,
    email: String,
    wallet: String,
    status: &'static str,
    has_account: bool,
    joined: String,
}

struct AdminJobRow {
    id: String,
    card: JobCard,
}

fn member_row(member: &Member) -> MemberRow {
    let status = if member.is_pending {
        "pending"
    } else if member.is_active {
        "active"
    } else {
        "inactive"
    };
    MemberRow {
        id: member.id.to_string(),
        name: format!("{} {}", member.first_name, member.last_name),
        email: member.email.clone(),
        wallet: member.wallet_address.clone().unwrap_or_default(),
        status,
        has_account: member.has_account(),
        joined: member.created_at.format("%Y-%m-%d").to_string(),
    }
}

pub async fn index(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_admin()?;

    let members = db::members::list(&state.pool, None, None).await?;
    let jobs = db::jobs::list(
        &state.pool,
        &JobFilter {
            include_inactive: true,
            ..JobFilter::default()
        },
    )
    .await?;

    let template = AdminTemplate {
        signed_in: true,
        email_enabled: state.mailer.is_some(),
        members: members.iter().map(member_row).collect(),
        jobs: jobs
            .iter()
            .map(|job| AdminJobRow {
                id: job.id.to_string(),
                card: job_card(job),
            })
            .collect(),
    };
    Ok(Html(template.render().unwrap_or_default()))
}
