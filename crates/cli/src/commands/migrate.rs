//! Database migration command.
//!
//! Applies `crates/server/migrations/` and creates the tower-sessions
//! table. The server never migrates on startup.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CliError, connect};

/// Run schema migrations, then create the session store table.
///
/// # Errors
///
/// Returns `CliError` if the connection or any migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool)
        .migrate()
        .await
        .map_err(|e| CliError::SessionStore(e.to_string()))?;

    tracing::info!("Migrations complete!");
    Ok(())
}
