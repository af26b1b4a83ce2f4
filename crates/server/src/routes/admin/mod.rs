//! Super-admin panel.

pub mod resellers;

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, response::IntoResponse, routing::get};
use tracing::instrument;

use qresto_core::Role;

use crate::db::{ProfileRepository, RestaurantRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireSuperAdmin;
use crate::models::ShopSummary;
use crate::state::AppState;

/// Shop list display data.
#[derive(Debug, Clone)]
pub struct ShopRow {
    pub name: String,
    pub slug: String,
    pub owner_email: String,
    pub menu_url: String,
    pub created: String,
}

impl ShopRow {
    fn new(shop: &ShopSummary, state: &AppState) -> Self {
        Self {
            name: shop.name.clone(),
            slug: shop.slug.to_string(),
            owner_email: shop
                .owner_email
                .as_ref()
                .map_or_else(|| "-".to_owned(), ToString::to_string),
            menu_url: state.config().menu_url(shop.slug.as_str()),
            created: shop.created_at.format("%d/%m/%Y").to_string(),
        }
    }
}

/// Admin home template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminTemplate {
    pub user_email: String,
    pub current_path: &'static str,
    pub restaurant_count: i64,
    pub reseller_count: i64,
    pub shops: Vec<ShopRow>,
}

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/resellers", get(resellers::index))
}

/// Counts, every shop with its owner, and the provisioning form.
#[instrument(skip_all)]
pub async fn index(
    admin: RequireSuperAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let restaurants = RestaurantRepository::new(state.pool());
    let shops = restaurants.list_with_owner().await?;
    let restaurant_count = restaurants.count().await?;
    let reseller_count = ProfileRepository::new(state.pool())
        .count_by_role(Role::Reseller)
        .await?;

    Ok(AdminTemplate {
        user_email: admin.user.email.to_string(),
        current_path: "/admin",
        restaurant_count,
        reseller_count,
        shops: shops.iter().map(|s| ShopRow::new(s, &state)).collect(),
    })
}
