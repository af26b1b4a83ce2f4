//! Category and product models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use qresto_core::{CategoryId, Price, ProductId, RestaurantId};

/// A menu category. Display order is creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub restaurant_id: RestaurantId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub price_without_tax: Option<Price>,
    pub image_url: Option<String>,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a product. New products are always visible.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub price_without_tax: Option<Price>,
    pub image_url: Option<String>,
}

/// Dashboard product list filter.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl ProductFilter {
    /// The `ILIKE` pattern for `search`, with wildcards in the input escaped.
    #[must_use]
    pub fn search_pattern(&self) -> Option<String> {
        let term = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let mut escaped = String::with_capacity(term.len() + 2);
        escaped.push('%');
        for c in term.chars() {
            if matches!(c, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped.push('%');
        Some(escaped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pattern_blank() {
        let filter = ProductFilter {
            search: Some("  ".to_string()),
            category_id: None,
        };
        assert_eq!(filter.search_pattern(), None);
        assert_eq!(ProductFilter::default().search_pattern(), None);
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        let filter = ProductFilter {
            search: Some(" 100%_pizza ".to_string()),
            category_id: None,
        };
        assert_eq!(filter.search_pattern().as_deref(), Some("%100\\%\\_pizza%"));
    }
}
