//! Reseller list.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use qresto_core::Role;

use crate::db::ProfileRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireSuperAdmin;
use crate::state::AppState;

/// Reseller display data.
#[derive(Debug, Clone)]
pub struct ResellerRow {
    pub email: String,
    pub created: String,
}

/// Reseller list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/resellers.html")]
pub struct ResellersTemplate {
    pub user_email: String,
    pub current_path: &'static str,
    pub resellers: Vec<ResellerRow>,
}

/// Profiles with the `reseller` role, newest first.
#[instrument(skip_all)]
pub async fn index(
    admin: RequireSuperAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let resellers = ProfileRepository::new(state.pool())
        .list_by_role(Role::Reseller)
        .await?;

    Ok(ResellersTemplate {
        user_email: admin.user.email.to_string(),
        current_path: "/admin/resellers",
        resellers: resellers
            .iter()
            .map(|p| ResellerRow {
                email: p.email.to_string(),
                created: p.created_at.format("%d/%m/%Y").to_string(),
            })
            .collect(),
    })
}
