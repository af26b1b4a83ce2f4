//! Menu resolution.
//!
//! Three independent reads (restaurant by slug, its categories, its visible
//! products) joined by a pure partition step. Any failure on the way
//! collapses into [`MenuResolution::Unavailable`]: diners never see the
//! difference between an unknown slug and a broken backend.

use std::future::Future;

use tracing::instrument;

use qresto_core::{RestaurantId, Slug};

use crate::db::RepositoryError;
use crate::models::{Category, Product, Restaurant};

/// The reads the resolver needs from the tenant store.
pub trait MenuSource {
    /// Restaurant with exactly this slug.
    fn restaurant_by_slug(
        &self,
        slug: &Slug,
    ) -> impl Future<Output = Result<Option<Restaurant>, RepositoryError>> + Send;

    /// Categories of a restaurant.
    fn categories(
        &self,
        restaurant_id: RestaurantId,
    ) -> impl Future<Output = Result<Vec<Category>, RepositoryError>> + Send;

    /// Visible products of a restaurant.
    fn visible_products(
        &self,
        restaurant_id: RestaurantId,
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;
}

/// One category with its visible products.
#[derive(Debug, Clone)]
pub struct MenuSection {
    pub category: Category,
    pub products: Vec<Product>,
}

/// A fully resolved public menu.
#[derive(Debug, Clone)]
pub struct Menu {
    pub restaurant: Restaurant,
    pub sections: Vec<MenuSection>,
}

/// Outcome of resolving a slug.
#[derive(Debug, Clone)]
pub enum MenuResolution {
    Found(Box<Menu>),
    Unavailable,
}

impl Menu {
    /// Group products under their categories.
    ///
    /// Categories come out in creation order (oldest first), products in
    /// reverse creation order (newest first). Hidden products, products of
    /// other restaurants and categories left without products are dropped,
    /// whatever order or filtering the inputs had.
    #[must_use]
    pub fn assemble(
        restaurant: Restaurant,
        mut categories: Vec<Category>,
        mut products: Vec<Product>,
    ) -> Self {
        categories.retain(|c| c.restaurant_id == restaurant.id);
        categories.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        products.retain(|p| p.is_visible && p.restaurant_id == restaurant.id);
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let sections = categories
            .into_iter()
            .filter_map(|category| {
                let items: Vec<Product> = products
                    .iter()
                    .filter(|p| p.category_id == category.id)
                    .cloned()
                    .collect();
                (!items.is_empty()).then_some(MenuSection {
                    category,
                    products: items,
                })
            })
            .collect();

        Self {
            restaurant,
            sections,
        }
    }

    /// True when there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of products across all sections.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.sections.iter().map(|s| s.products.len()).sum()
    }
}

/// Resolve the public menu for a raw URL slug.
///
/// The three reads are issued in sequence. A malformed slug, a missing
/// restaurant and any backend error all yield `Unavailable`.
#[instrument(skip(source), fields(restaurant_id = tracing::field::Empty))]
pub async fn resolve_menu<S: MenuSource>(source: &S, raw_slug: &str) -> MenuResolution {
    let Ok(slug) = Slug::parse(raw_slug) else {
        tracing::debug!("Rejected malformed slug");
        return MenuResolution::Unavailable;
    };

    let restaurant = match source.restaurant_by_slug(&slug).await {
        Ok(Some(restaurant)) => restaurant,
        Ok(None) => {
            tracing::debug!("No restaurant for slug");
            return MenuResolution::Unavailable;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Restaurant lookup failed");
            return MenuResolution::Unavailable;
        }
    };
    tracing::Span::current().record("restaurant_id", tracing::field::display(restaurant.id));

    let categories = match source.categories(restaurant.id).await {
        Ok(categories) => categories,
        Err(e) => {
            tracing::warn!(error = %e, "Category lookup failed");
            return MenuResolution::Unavailable;
        }
    };

    let products = match source.visible_products(restaurant.id).await {
        Ok(products) => products,
        Err(e) => {
            tracing::warn!(error = %e, "Product lookup failed");
            return MenuResolution::Unavailable;
        }
    };

    MenuResolution::Found(Box::new(Menu::assemble(restaurant, categories, products)))
}
