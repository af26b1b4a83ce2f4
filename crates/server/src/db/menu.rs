//! Postgres-backed [`MenuSource`].

use sqlx::PgPool;

use qresto_core::{RestaurantId, Slug};

use super::{CategoryRepository, ProductRepository, RepositoryError, RestaurantRepository};
use crate::models::{Category, Product, Restaurant};
use crate::services::menu::MenuSource;

/// Reads for the public menu.
pub struct MenuRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MenuRepository<'a> {
    /// Create a new menu repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl MenuSource for MenuRepository<'_> {
    async fn restaurant_by_slug(&self, slug: &Slug) -> Result<Option<Restaurant>, RepositoryError> {
        RestaurantRepository::new(self.pool).get_by_slug(slug).await
    }

    async fn categories(&self, restaurant_id: RestaurantId) -> Result<Vec<Category>, RepositoryError> {
        CategoryRepository::new(self.pool).list(restaurant_id).await
    }

    async fn visible_products(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(self.pool).list_visible(restaurant_id).await
    }
}
