//! Category repository. Every query is scoped by restaurant.

use sqlx::PgPool;

use qresto_core::{CategoryId, RestaurantId};

use super::{Conflict, RepositoryError};
use crate::models::Category;

/// Repository for menu categories.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a restaurant's categories in creation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, restaurant_id: RestaurantId) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, restaurant_id, name, created_at
            FROM category
            WHERE restaurant_id = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(restaurant_id)
        .fetch_all(self.pool)
        .await?;
        Ok(categories)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        restaurant_id: RestaurantId,
        name: &str,
    ) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            INSERT INTO category (restaurant_id, name)
            VALUES ($1, $2)
            RETURNING id, restaurant_id, name, created_at
            ",
        )
        .bind(restaurant_id)
        .bind(name)
        .fetch_one(self.pool)
        .await?;
        Ok(category)
    }

    /// Hard-delete a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category is not in this restaurant.
    /// Returns `RepositoryError::Conflict` if products still reference it.
    pub async fn delete(
        &self,
        restaurant_id: RestaurantId,
        id: CategoryId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1 AND restaurant_id = $2")
            .bind(id)
            .bind(restaurant_id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(Conflict::CategoryHasProducts);
                }
                RepositoryError::Database(e)
            })?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count a restaurant's categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, restaurant_id: RestaurantId) -> Result<i64, RepositoryError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM category WHERE restaurant_id = $1")
                .bind(restaurant_id)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }
}
