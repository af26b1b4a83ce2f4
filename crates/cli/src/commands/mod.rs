//! CLI subcommands.
//!
//! # Environment Variables
//!
//! - `QRESTO_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `QRESTO_PROVISIONING_DATABASE_URL` - Elevated connection, preferred for
//!   migrations and account creation when set

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

use qresto_server::db::RepositoryError;
use qresto_server::services::auth::AuthError;
use qresto_server::services::provisioning::ProvisionError;

/// Errors from any subcommand.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Session store error: {0}")]
    SessionStore(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Provisioning error: {0}")]
    Provision(#[from] ProvisionError),

    #[error("Invalid price: {0}")]
    Price(#[from] qresto_core::PriceError),
}

/// Elevated URL if configured, else the main one.
fn database_url() -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    ["QRESTO_PROVISIONING_DATABASE_URL", "QRESTO_DATABASE_URL", "DATABASE_URL"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .map(SecretString::from)
        .ok_or(CliError::MissingEnvVar("QRESTO_DATABASE_URL"))
}

/// Connect with the URL from [`database_url`].
async fn connect() -> Result<PgPool, CliError> {
    let url = database_url()?;
    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(url.expose_secret()).await?)
}
