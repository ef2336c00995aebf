pub mod auth_redirect;
pub mod client_ip;
