//! Profile repository.

use sqlx::PgPool;

use qresto_core::{Email, ProfileId, Role};

use super::{Conflict, RepositoryError};
use crate::models::Profile;

/// Repository for profiles and their roles.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a profile by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT id, email, role, created_at FROM profile WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(profile)
    }

    /// Insert the profile for an existing identity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the identity already has a profile.
    pub async fn insert(
        &self,
        id: ProfileId,
        email: &Email,
        role: Role,
    ) -> Result<Profile, RepositoryError> {
        sqlx::query_as::<_, Profile>(
            r"
            INSERT INTO profile (id, email, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, role, created_at
            ",
        )
        .bind(id)
        .bind(email)
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::unique_or(e, Conflict::ProfileExists))
    }

    /// Delete a profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no profile has this id.
    pub async fn delete(&self, id: ProfileId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM profile WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// List profiles with a role, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_role(&self, role: Role) -> Result<Vec<Profile>, RepositoryError> {
        let profiles = sqlx::query_as::<_, Profile>(
            r"
            SELECT id, email, role, created_at
            FROM profile
            WHERE role = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(role)
        .fetch_all(self.pool)
        .await?;
        Ok(profiles)
    }

    /// Count profiles with a role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_role(&self, role: Role) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profile WHERE role = $1")
            .bind(role)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
