//! JSON API.

pub mod shops;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/shops", post(shops::create))
}
