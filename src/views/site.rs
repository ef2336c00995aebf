use askama::Template;
use axum::response::{Html, IntoResponse};
use axum_extra::extract::CookieJar;

use crate::auth::extractor::ACCESS_COOKIE;

#[derive(Template)]
#[template(path = "site/home.html")]
struct HomeTemplate {
    signed_in: bool,
}

#[derive(Template)]
#[template(path = "site/about.html")]
struct AboutTemplate {
    signed_in: bool,
}

fn signed_in(jar: &CookieJar) -> bool {
    jar.get(ACCESS_COOKIE).is_some_and(|c| !c.value().is_empty())
}

pub async fn home(jar: CookieJar) -> impl IntoResponse {
    let template = HomeTemplate {
        signed_in: signed_in(&jar),
    };
    Html(template.render().unwrap_or_default())
}

pub async fn about(jar: CookieJar) -> impl IntoResponse {
    let template = AboutTemplate {
        signed_in: signed_in(&jar),
    };
    Html(template.render().unwrap_or_default())
}
