//! Product repository. Every query is scoped by restaurant.

use sqlx::PgPool;

use qresto_core::{ProductId, RestaurantId};

use super::{Conflict, RepositoryError};
use crate::models::{NewProduct, Product, ProductFilter};

const PRODUCT_COLUMNS: &str = "id, restaurant_id, category_id, name, description, price, \
                               price_without_tax, image_url, is_visible, created_at";

/// Repository for menu products.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a restaurant's products for the dashboard, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        restaurant_id: RestaurantId,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product \
             WHERE restaurant_id = $1 \
               AND ($2::text IS NULL OR name ILIKE $2) \
               AND ($3::uuid IS NULL OR category_id = $3) \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(restaurant_id)
        .bind(filter.search_pattern())
        .bind(filter.category_id)
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// List a restaurant's visible products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_visible(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product \
             WHERE restaurant_id = $1 AND is_visible \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(restaurant_id)
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// Create a visible product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the category is not part of
    /// this restaurant.
    pub async fn create(
        &self,
        restaurant_id: RestaurantId,
        new: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO product \
             (restaurant_id, category_id, name, description, price, price_without_tax, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(restaurant_id)
        .bind(new.category_id)
        .bind(&new.name)
        .bind(new.description.as_deref())
        .bind(new.price)
        .bind(new.price_without_tax)
        .bind(new.image_url.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::Conflict(Conflict::UnknownCategory);
            }
            RepositoryError::Database(e)
        })
    }

    /// Set a product's visibility and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not in this restaurant.
    pub async fn set_visibility(
        &self,
        restaurant_id: RestaurantId,
        id: ProductId,
        visible: bool,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE product SET is_visible = $3 \
             WHERE id = $1 AND restaurant_id = $2 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(restaurant_id)
        .bind(visible)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not in this restaurant.
    pub async fn delete(
        &self,
        restaurant_id: RestaurantId,
        id: ProductId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1 AND restaurant_id = $2")
            .bind(id)
            .bind(restaurant_id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count a restaurant's products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, restaurant_id: RestaurantId) -> Result<i64, RepositoryError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product WHERE restaurant_id = $1")
                .bind(restaurant_id)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }
}
