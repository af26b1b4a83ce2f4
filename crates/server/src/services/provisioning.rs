//! Shop provisioning.
//!
//! Creating a tenant takes three writes: auth identity, then a `client`
//! profile, then the restaurant pointing at that profile. There is no
//! transaction across them. If a later step fails, the earlier ones are
//! undone in reverse order; if an undo fails too, the orphaned ids are
//! logged at error level.

use std::future::Future;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use qresto_core::{Email, ProfileId, Role, Slug};

use crate::db::RepositoryError;
use crate::models::{NewRestaurant, Restaurant};
use crate::services::auth::{self, AuthError};

/// Body of `POST /api/shops`.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Deserialize)]
pub struct ShopRequest {
    pub name: String,
    pub slug: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for ShopRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopRequest")
            .field("name", &self.name)
            .field("slug", &self.slug)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A request that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedShop {
    pub name: String,
    pub slug: Slug,
    pub email: Email,
    password: SecretString,
}

/// Why provisioning failed.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("email already registered")]
    EmailTaken,

    #[error("slug already in use")]
    SlugTaken,

    #[error("failed to {step}: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: RepositoryError,
    },

    #[error("password hashing failed")]
    PasswordHash,
}

impl ProvisionError {
    /// Whether this is a server-side failure rather than bad input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Step { .. } | Self::PasswordHash)
    }
}

/// The writes provisioning performs.
pub trait ProvisioningBackend {
    /// Create a login identity and return its id.
    fn create_identity(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> impl Future<Output = Result<ProfileId, RepositoryError>> + Send;

    fn delete_identity(
        &self,
        id: ProfileId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn insert_profile(
        &self,
        id: ProfileId,
        email: &Email,
        role: Role,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn delete_profile(
        &self,
        id: ProfileId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn insert_restaurant(
        &self,
        restaurant: &NewRestaurant,
    ) -> impl Future<Output = Result<Restaurant, RepositoryError>> + Send;
}

impl ShopRequest {
    /// Validate every field before any write happens.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::InvalidRequest` naming the first bad field.
    pub fn validate(self) -> Result<ValidatedShop, ProvisionError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(ProvisionError::InvalidRequest(
                "name is required".to_owned(),
            ));
        }
        let slug = Slug::normalize(&self.slug)
            .map_err(|e| ProvisionError::InvalidRequest(e.to_string()))?;
        let email =
            Email::parse(&self.email).map_err(|e| ProvisionError::InvalidRequest(e.to_string()))?;
        auth::validate_password(&self.password).map_err(|e| match e {
            AuthError::WeakPassword(msg) => ProvisionError::InvalidRequest(msg),
            other => ProvisionError::InvalidRequest(other.to_string()),
        })?;

        Ok(ValidatedShop {
            name,
            slug,
            email,
            password: SecretString::from(self.password),
        })
    }
}

/// Provision a shop: identity, profile, restaurant.
///
/// # Errors
///
/// Returns the first failure. Earlier writes have been compensated by the
/// time this returns.
#[instrument(skip(backend, request), fields(slug = %request.slug))]
pub async fn provision_shop<B: ProvisioningBackend>(
    backend: &B,
    request: ShopRequest,
) -> Result<Restaurant, ProvisionError> {
    let shop = request.validate()?;
    let password_hash =
        auth::hash_password(shop.password.expose_secret()).map_err(|_| ProvisionError::PasswordHash)?;

    let owner_id = backend
        .create_identity(&shop.email, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => ProvisionError::EmailTaken,
            source => ProvisionError::Step {
                step: "create identity",
                source,
            },
        })?;

    if let Err(source) = backend.insert_profile(owner_id, &shop.email, Role::Client).await {
        undo_identity(backend, owner_id).await;
        return Err(ProvisionError::Step {
            step: "create profile",
            source,
        });
    }

    let new_restaurant = NewRestaurant {
        slug: shop.slug,
        name: shop.name,
        owner_id,
    };
    match backend.insert_restaurant(&new_restaurant).await {
        Ok(restaurant) => {
            tracing::info!(restaurant_id = %restaurant.id, %owner_id, "Shop provisioned");
            Ok(restaurant)
        }
        Err(e) => {
            undo_profile(backend, owner_id).await;
            undo_identity(backend, owner_id).await;
            Err(match e {
                RepositoryError::Conflict(_) => ProvisionError::SlugTaken,
                source => ProvisionError::Step {
                    step: "create restaurant",
                    source,
                },
            })
        }
    }
}

async fn undo_profile<B: ProvisioningBackend>(backend: &B, id: ProfileId) {
    if let Err(e) = backend.delete_profile(id).await {
        tracing::error!(profile_id = %id, error = %e, "Compensation failed: orphaned profile");
    }
}

async fn undo_identity<B: ProvisioningBackend>(backend: &B, id: ProfileId) {
    if let Err(e) = backend.delete_identity(id).await {
        tracing::error!(identity_id = %id, error = %e, "Compensation failed: orphaned identity");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request() -> ShopRequest {
        ShopRequest {
            name: "  El Faro ".to_string(),
            slug: "El Faro".to_string(),
            email: "Duenio@ElFaro.com".to_string(),
            password: "faro-2026".to_string(),
        }
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let shop = request().validate().unwrap();
        assert_eq!(shop.name, "El Faro");
        assert_eq!(shop.slug.as_str(), "el-faro");
        assert_eq!(shop.email.as_str(), "duenio@elfaro.com");
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut req = request();
        req.name = "   ".to_string();
        assert!(matches!(req.validate(), Err(ProvisionError::InvalidRequest(_))));
    }

    #[test]
    fn test_validate_rejects_reserved_slug() {
        let mut req = request();
        req.slug = "Admin".to_string();
        assert!(matches!(req.validate(), Err(ProvisionError::InvalidRequest(_))));
    }

    #[test]
    fn test_validate_rejects_short_password() {
        let mut req = request();
        req.password = "corta".to_string();
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("at least 8"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug_output = format!("{:?}", request());
        assert!(!debug_output.contains("faro-2026"));
    }

    #[test]
    fn test_is_internal() {
        assert!(!ProvisionError::SlugTaken.is_internal());
        assert!(ProvisionError::PasswordHash.is_internal());
    }
}
