//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                  - Landing page
//! GET  /login                             - Login page
//! POST /login                             - Login action (rate limited)
//! POST /logout                            - Logout action
//!
//! # Owner dashboard (RequireOwner)
//! GET    /dashboard                       - Summary
//! GET    /dashboard/categories            - Category list
//! POST   /dashboard/categories            - Create (row fragment or redirect)
//! DELETE /dashboard/categories/{id}       - Delete
//! GET    /dashboard/products              - Product list (?q=, ?category=)
//! POST   /dashboard/products              - Create, multipart with optional image
//! DELETE /dashboard/products/{id}         - Delete
//! POST   /dashboard/products/{id}/visibility - Set visibility (JSON)
//! GET    /dashboard/settings              - Branding and WiFi form
//! POST   /dashboard/settings              - Save, multipart with optional logo
//!
//! # Super admin (RequireSuperAdmin)
//! GET  /admin                             - Shops, counts, provisioning form
//! GET  /admin/resellers                   - Reseller profiles
//! POST /api/shops                         - Provision a shop (JSON)
//!
//! # Public
//! GET  /{slug}                            - Restaurant menu
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod dashboard;
pub mod home;
pub mod menu;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};

use crate::middleware::login_rate_limiter;
use crate::state::AppState;

/// Header set by the dashboard script on enhanced requests.
pub const FRAGMENT_REQUEST_HEADER: &str = "hx-request";

/// Whether the caller wants an HTML fragment instead of a redirect.
#[must_use]
pub fn wants_fragment(headers: &HeaderMap) -> bool {
    headers
        .get(FRAGMENT_REQUEST_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).route_layer(login_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
}

/// Create all routes.
///
/// `/{slug}` is registered last but static paths always win over it.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(auth_routes())
        .nest("/dashboard", dashboard::routes())
        .nest("/admin", admin::routes())
        .nest("/api", api::routes())
        .route("/{slug}", get(menu::show))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_wants_fragment() {
        let mut headers = HeaderMap::new();
        assert!(!wants_fragment(&headers));

        headers.insert(FRAGMENT_REQUEST_HEADER, HeaderValue::from_static("true"));
        assert!(wants_fragment(&headers));

        headers.insert(FRAGMENT_REQUEST_HEADER, HeaderValue::from_static("false"));
        assert!(!wants_fragment(&headers));
    }
}
