pub mod auth;
pub mod chat;
pub mod invites;
pub mod jobs;
pub mod members;
pub mod password_reset;
pub mod profiles;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        // Members (admin)
        .route(
            "/api/admin/members",
            get(members::list).post(members::create),
        )
        .route(
            "/api/admin/members/{id}",
            get(members::get)
                .put(members::update)
                .delete(members::delete),
        )
        .route("/api/admin/members/{id}/invite", post(members::send_invite))
        .route(
            "/api/admin/members/{id}/reset-password",
            post(members::send_password_reset),
        )
        .route("/api/admin/invites", post(invites::create))
        .route("/api/admin/profiles/{email}", get(profiles::get_by_email))
        // Jobs
        .route("/api/jobs", get(jobs::list))
        .route("/api/jobs/{id}", get(jobs::get))
        .route("/api/admin/jobs", post(jobs::create))
        .route(
            "/api/admin/jobs/{id}",
            put(jobs::update).delete(jobs::delete),
        )
        // Invites
        .route("/api/invites/validate", get(invites::validate))
        .route("/api/invites/accept", post(invites::accept))
        // Password resets
        .route("/api/password-reset/request", post(password_reset::request))
        .route("/api/password-reset/validate", get(password_reset::validate))
        .route("/api/password-reset/confirm", post(password_reset::confirm))
        // Profile
        .route(
            "/api/profile",
            get(profiles::get_own).put(profiles::update_own),
        )
        // Chat
        .route("/api/chat", post(chat::chat))
}
