//! Public menu page.
//!
//! `GET /{slug}` resolves the restaurant and renders categories with their
//! visible products. Every failure renders the same "unavailable" page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::db::MenuRepository;
use crate::filters;
use crate::models::{Product, WifiDetails};
use crate::services::menu::navigator::{
    COPY_FEEDBACK, DESCRIPTION_FALLBACK, GUARD_WINDOW, OPEN_NETWORK_LABEL, as_millis,
};
use crate::services::menu::{CategoryNavigator, Menu, MenuResolution, WifiBubble, resolve_menu};
use crate::state::AppState;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub has_description: bool,
    pub price: String,
    pub price_without_tax: Option<String>,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let description = product
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: description.unwrap_or(DESCRIPTION_FALLBACK).to_owned(),
            has_description: description.is_some(),
            price: product.price.to_string(),
            price_without_tax: product.price_without_tax.map(|p| p.to_string()),
            image_url: product.image_url.clone(),
        }
    }
}

/// One rendered category section.
#[derive(Debug, Clone)]
pub struct SectionView {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub products: Vec<ProductView>,
}

/// WiFi bubble display data.
#[derive(Debug, Clone)]
pub struct WifiView {
    pub ssid: String,
    pub password: Option<String>,
    pub password_label: String,
    pub can_copy: bool,
}

impl From<WifiDetails> for WifiView {
    fn from(wifi: WifiDetails) -> Self {
        let bubble = WifiBubble::new(wifi.password.is_some());
        Self {
            password_label: wifi
                .password
                .clone()
                .unwrap_or_else(|| OPEN_NETWORK_LABEL.to_owned()),
            can_copy: bubble.can_copy(),
            ssid: wifi.ssid,
            password: wifi.password,
        }
    }
}

/// Public menu template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/show.html")]
pub struct MenuTemplate {
    pub name: String,
    pub logo_url: Option<String>,
    pub brand_color: String,
    pub sections: Vec<SectionView>,
    pub wifi: Option<WifiView>,
    pub guard_ms: u128,
    pub copy_feedback_ms: u128,
}

impl From<Menu> for MenuTemplate {
    fn from(menu: Menu) -> Self {
        let navigator = CategoryNavigator::new(menu.sections.first().map(|s| s.category.id));
        let sections = menu
            .sections
            .iter()
            .map(|section| SectionView {
                id: section.category.id.to_string(),
                name: section.category.name.clone(),
                active: navigator.is_active(section.category.id),
                products: section.products.iter().map(ProductView::from).collect(),
            })
            .collect();

        Self {
            wifi: menu.restaurant.wifi().map(WifiView::from),
            name: menu.restaurant.name,
            logo_url: menu.restaurant.logo_url,
            brand_color: menu.restaurant.brand_color.to_string(),
            sections,
            guard_ms: as_millis(GUARD_WINDOW),
            copy_feedback_ms: as_millis(COPY_FEEDBACK),
        }
    }
}

/// Shown for unknown slugs and backend failures alike.
#[derive(Template, WebTemplate)]
#[template(path = "menu/unavailable.html")]
pub struct UnavailableTemplate;

/// Display a restaurant's public menu.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let source = MenuRepository::new(state.pool());
    match resolve_menu(&source, &slug).await {
        MenuResolution::Found(menu) => MenuTemplate::from(*menu).into_response(),
        MenuResolution::Unavailable => (StatusCode::NOT_FOUND, UnavailableTemplate).into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use qresto_core::{BrandColor, CategoryId, Price, ProductId, RestaurantId, Slug};

    use super::*;
    use crate::models::{Category, Restaurant};

    fn restaurant() -> Restaurant {
        Restaurant {
            id: RestaurantId::generate(),
            slug: Slug::parse("el-faro").unwrap(),
            name: "El Faro".to_string(),
            logo_url: None,
            brand_color: BrandColor::default(),
            wifi_active: true,
            wifi_ssid: Some("FaroGuest".to_string()),
            wifi_password: None,
            owner_id: None,
            created_at: Utc::now(),
        }
    }

    fn product(restaurant: &Restaurant, category: &Category, name: &str, price: i64) -> Product {
        Product {
            id: ProductId::generate(),
            restaurant_id: restaurant.id,
            category_id: category.id,
            name: name.to_string(),
            description: None,
            price: Price::new(price).unwrap(),
            price_without_tax: Some(Price::new(7025).unwrap()),
            image_url: None,
            is_visible: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_product_view_formats_prices_and_fallback() {
        let r = restaurant();
        let platos = Category {
            id: CategoryId::generate(),
            restaurant_id: r.id,
            name: "Platos".to_string(),
            created_at: Utc::now(),
        };
        let view = ProductView::from(&product(&r, &platos, "Pizza", 8500));
        assert_eq!(view.price, "$8.500");
        assert_eq!(view.price_without_tax.as_deref(), Some("$7.025"));
        assert_eq!(view.description, DESCRIPTION_FALLBACK);
        assert!(!view.has_description);
    }

    #[test]
    fn test_menu_template_first_section_active() {
        let r = restaurant();
        let platos = Category {
            id: CategoryId::generate(),
            restaurant_id: r.id,
            name: "Platos".to_string(),
            created_at: Utc::now(),
        };
        let pizza = product(&r, &platos, "Pizza", 8500);
        let menu = Menu::assemble(r, vec![platos], vec![pizza]);

        let template = MenuTemplate::from(menu);
        assert_eq!(template.sections.len(), 1);
        assert!(template.sections[0].active);
        assert_eq!(template.brand_color, "#10b981");
        assert_eq!(template.guard_ms, 800);

        let wifi = template.wifi.as_ref().unwrap();
        assert_eq!(wifi.password_label, OPEN_NETWORK_LABEL);
        assert!(!wifi.can_copy);

        let html = template.render().unwrap();
        assert!(html.contains("Pizza"));
        assert!(html.contains("$8.500"));
    }

    #[test]
    fn test_unavailable_page_renders() {
        let html = UnavailableTemplate.render().unwrap();
        assert!(html.contains("Menú no disponible."));
    }
}
