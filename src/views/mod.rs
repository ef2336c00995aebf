pub mod admin;
pub mod auth;
pub mod careers;
pub mod site;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

/// Public pages. Token pages validate server-side so a dead link fails early.
pub fn public_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(site::home))
        .route("/about", get(site::about))
        .route("/login", get(auth::login_page))
        .route("/forgot-password", get(auth::forgot_password_page))
        .route("/accept-invite", get(auth::accept_invite_page))
        .route("/reset-password", get(auth::reset_password_page))
}

/// Pages that need a session; 401s are turned into a redirect to `/login`.
pub fn portal_routes() -> Router<SharedState> {
    Router::new()
        .route("/careers", get(careers::index))
        .route("/admin", get(admin::index))
}
