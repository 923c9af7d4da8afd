//! Migrate command - manages the accounts schema by hand.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // The subcommand decides what runs, so skip the automatic migration pass
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let outcome = match args.action {
        MigrateAction::Up => {
            tracing::info!("Applying pending migrations...");
            db.run_migrations().await
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back last migration...");
            db.rollback_migration().await
        }
        MigrateAction::Status => {
            return print_status(&db).await;
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping the accounts schema and re-running all migrations...");
            db.fresh_migrations().await
        }
    };

    outcome.map_err(|e| AppError::internal(format!("Migration failed: {}", e)))?;
    tracing::info!("Migration command completed");
    Ok(())
}

/// Print each defined migration with its applied state.
async fn print_status(db: &Database) -> AppResult<()> {
    let status = db
        .migration_status()
        .await
        .map_err(|e| AppError::internal(format!("Migration status failed: {}", e)))?;

    for (name, applied) in status {
        println!("{}: {}", name, if applied { "applied" } else { "pending" });
    }

    Ok(())
}
