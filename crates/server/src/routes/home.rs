//! Landing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::CurrentUser;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<CurrentUser>,
}

/// Display the landing page.
pub async fn home(OptionalUser(user): OptionalUser) -> impl IntoResponse {
    HomeTemplate { user }
}
