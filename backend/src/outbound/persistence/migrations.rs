//! Embedded schema migrations.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::pool::PoolError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration to the database at `database_url`.
///
/// Uses a blocking connection; call it from `spawn_blocking` inside async
/// code.
///
/// # Errors
/// Returns [`PoolError::Build`] when the database is unreachable or a
/// migration fails.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, PoolError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| PoolError::build(format!("connect for migrations: {err}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| PoolError::build(format!("migration: {err}")))?;
    info!(count = applied.len(), "database migrations applied");
    Ok(applied.len())
}
