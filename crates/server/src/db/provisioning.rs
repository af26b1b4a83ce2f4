//! Postgres-backed [`ProvisioningBackend`].
//!
//! Runs on the elevated provisioning pool, never the request pool.

use sqlx::PgPool;

use qresto_core::{Email, ProfileId, Role};

use super::{AuthIdentityRepository, ProfileRepository, RepositoryError, RestaurantRepository};
use crate::models::{NewRestaurant, Restaurant};
use crate::services::provisioning::ProvisioningBackend;

/// Provisioning writes against the tenant store.
pub struct ProvisioningRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProvisioningRepository<'a> {
    /// Create a provisioning repository over the elevated pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl ProvisioningBackend for ProvisioningRepository<'_> {
    async fn create_identity(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<ProfileId, RepositoryError> {
        AuthIdentityRepository::new(self.pool)
            .create(email, password_hash)
            .await
    }

    async fn delete_identity(&self, id: ProfileId) -> Result<(), RepositoryError> {
        AuthIdentityRepository::new(self.pool).delete(id).await
    }

    async fn insert_profile(
        &self,
        id: ProfileId,
        email: &Email,
        role: Role,
    ) -> Result<(), RepositoryError> {
        ProfileRepository::new(self.pool)
            .insert(id, email, role)
            .await
            .map(|_| ())
    }

    async fn delete_profile(&self, id: ProfileId) -> Result<(), RepositoryError> {
        ProfileRepository::new(self.pool).delete(id).await
    }

    async fn insert_restaurant(
        &self,
        restaurant: &NewRestaurant,
    ) -> Result<Restaurant, RepositoryError> {
        RestaurantRepository::new(self.pool).insert(restaurant).await
    }
}
