//! Database operations for the tenant store.
//!
//! ## Tables
//!
//! - `auth_identity` - Login email and Argon2id password hash
//! - `profile` - Role of each identity (`super_admin`, `client`, `reseller`)
//! - `restaurant` - One row per tenant, looked up publicly by slug
//! - `category` / `product` - The menu itself, always scoped by `restaurant_id`
//! - `tower_sessions.session` - Session storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p qresto-cli -- migrate
//! ```

pub mod categories;
pub mod identities;
pub mod menu;
pub mod products;
pub mod profiles;
pub mod provisioning;
pub mod restaurants;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use identities::AuthIdentityRepository;
pub use menu::MenuRepository;
pub use products::ProductRepository;
pub use profiles::ProfileRepository;
pub use provisioning::ProvisioningRepository;
pub use restaurants::RestaurantRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique slug).
    #[error("constraint violation: {0}")]
    Conflict(Conflict),
}

/// Which constraint a write ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Conflict {
    #[error("email already exists")]
    EmailTaken,
    #[error("profile already exists")]
    ProfileExists,
    #[error("slug already exists")]
    SlugTaken,
    #[error("category has products")]
    CategoryHasProducts,
    #[error("category does not exist")]
    UnknownCategory,
}

impl RepositoryError {
    /// Map unique violations to `Conflict(conflict)`, everything else to `Database`.
    fn unique_or(err: sqlx::Error, conflict: Conflict) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict);
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Create a small pool for rarely used elevated operations.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_provisioning_pool(
    database_url: &secrecy::SecretString,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(2)
        .min_connections(0)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
