//! Schema migrations for the `crud_demo` table.
//!
//! The migration files live in `crud-demo-data/migrations` and are embedded
//! at compile time with `sqlx::migrate!()`. They are reversible: `apply`
//! creates the table, `rollback` drops it.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;

use crate::error::DataError;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply every pending migration.
pub async fn apply(pool: &SqlitePool) -> Result<(), DataError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("schema migrations applied");
    Ok(())
}

/// Revert every applied migration, dropping the `crud_demo` table.
pub async fn rollback(pool: &SqlitePool) -> Result<(), DataError> {
    MIGRATOR.undo(pool, 0).await?;
    tracing::info!("schema migrations rolled back");
    Ok(())
}
