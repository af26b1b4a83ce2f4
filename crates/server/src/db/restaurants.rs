//! Restaurant repository.

use sqlx::PgPool;

use qresto_core::{ProfileId, RestaurantId, Slug};

use super::{Conflict, RepositoryError};
use crate::models::{NewRestaurant, Restaurant, RestaurantSettings, ShopSummary};

const RESTAURANT_COLUMNS: &str = "id, slug, name, logo_url, brand_color, wifi_active, \
                                  wifi_ssid, wifi_password, owner_id, created_at";

/// Repository for restaurant rows.
pub struct RestaurantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RestaurantRepository<'a> {
    /// Create a new restaurant repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a restaurant by its public slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &Slug) -> Result<Option<Restaurant>, RepositoryError> {
        let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurant WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;
        Ok(restaurant)
    }

    /// Look up the restaurant owned by a profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_owner(
        &self,
        owner_id: ProfileId,
    ) -> Result<Option<Restaurant>, RepositoryError> {
        let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurant WHERE owner_id = $1 \
             ORDER BY created_at LIMIT 1"
        ))
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(restaurant)
    }

    /// Insert a restaurant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn insert(&self, new: &NewRestaurant) -> Result<Restaurant, RepositoryError> {
        sqlx::query_as::<_, Restaurant>(&format!(
            "INSERT INTO restaurant (slug, name, owner_id) VALUES ($1, $2, $3) \
             RETURNING {RESTAURANT_COLUMNS}"
        ))
        .bind(&new.slug)
        .bind(&new.name)
        .bind(new.owner_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::unique_or(e, Conflict::SlugTaken))
    }

    /// Save branding and WiFi settings. A `None` logo keeps the current one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the restaurant does not exist.
    pub async fn update_settings(
        &self,
        id: RestaurantId,
        settings: &RestaurantSettings,
    ) -> Result<Restaurant, RepositoryError> {
        sqlx::query_as::<_, Restaurant>(&format!(
            "UPDATE restaurant SET brand_color = $2, logo_url = COALESCE($3, logo_url), \
             wifi_active = $4, wifi_ssid = $5, wifi_password = $6 \
             WHERE id = $1 RETURNING {RESTAURANT_COLUMNS}"
        ))
        .bind(id)
        .bind(&settings.brand_color)
        .bind(settings.logo_url.as_deref())
        .bind(settings.wifi_active)
        .bind(settings.wifi_ssid.as_deref())
        .bind(settings.wifi_password.as_deref())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// List every shop with its owner's email, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_owner(&self) -> Result<Vec<ShopSummary>, RepositoryError> {
        let shops = sqlx::query_as::<_, ShopSummary>(
            r"
            SELECT r.id, r.slug, r.name, p.email AS owner_email, r.created_at
            FROM restaurant r
            LEFT JOIN profile p ON p.id = r.owner_id
            ORDER BY r.created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(shops)
    }

    /// Count all restaurants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM restaurant")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
