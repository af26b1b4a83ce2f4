//! Password authentication.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use qresto_core::{Email, Role};

use crate::db::{AuthIdentityRepository, ProfileRepository, RepositoryError};
use crate::models::Profile;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    identities: AuthIdentityRepository<'a>,
    profiles: ProfileRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            identities: AuthIdentityRepository::new(pool),
            profiles: ProfileRepository::new(pool),
        }
    }

    /// Login with email and password.
    ///
    /// An identity without a profile cannot log in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<Profile, AuthError> {
        let email = Email::parse(email)?;

        let (id, password_hash) = self
            .identities
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        self.profiles
            .get_by_id(id)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Create an identity and profile in one go. Used to bootstrap super admins.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email is taken and
    /// `AuthError::WeakPassword` if the password is too short.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Profile, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let id = self
            .identities
            .create(&email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        match self.profiles.insert(id, &email, role).await {
            Ok(profile) => Ok(profile),
            Err(e) => {
                if let Err(cleanup) = self.identities.delete(id).await {
                    tracing::error!(identity_id = %id, error = %cleanup, "Failed to remove identity without profile");
                }
                Err(e.into())
            }
        }
    }
}

/// Check a password against the length policy.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch or an unreadable hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("faro-secreto").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("faro-secreto", &hash).is_ok());
        assert!(matches!(
            verify_password("otra-clave", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_garbage_hash() {
        assert!(matches!(
            verify_password("whatever", "not-a-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(validate_password("1234567"), Err(AuthError::WeakPassword(_))));
        assert!(validate_password("12345678").is_ok());
    }
}
