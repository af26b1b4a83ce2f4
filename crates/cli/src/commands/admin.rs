//! Super admin account management.

use qresto_core::Role;
use qresto_server::services::auth::AuthService;

use super::{CliError, connect};

/// Create a `super_admin` identity and profile.
///
/// # Errors
///
/// Returns `CliError::Auth` for an invalid email, a short password or an
/// email that is already registered.
pub async fn create_super_admin(email: &str, password: &str) -> Result<(), CliError> {
    let pool = connect().await?;

    let profile = AuthService::new(&pool)
        .register(email, password, Role::SuperAdmin)
        .await?;

    tracing::info!(profile_id = %profile.id, email = %profile.email, "Super admin created");
    Ok(())
}
