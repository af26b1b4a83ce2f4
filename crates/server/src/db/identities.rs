//! Auth identity repository.

use sqlx::PgPool;

use qresto_core::{Email, ProfileId};

use super::{Conflict, RepositoryError};

/// Repository for login identities.
pub struct AuthIdentityRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AuthIdentityRepository<'a> {
    /// Create a new identity repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an identity and return its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<ProfileId, RepositoryError> {
        sqlx::query_scalar::<_, ProfileId>(
            r"
            INSERT INTO auth_identity (email, password_hash)
            VALUES ($1, $2)
            RETURNING id
            ",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::unique_or(e, Conflict::EmailTaken))
    }

    /// Get the id and password hash for an email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(ProfileId, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, (ProfileId, String)>(
            "SELECT id, password_hash FROM auth_identity WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Delete an identity. Its profile goes with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no identity has this id.
    pub async fn delete(&self, id: ProfileId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM auth_identity WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
