//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    tracing::info!(action = ?args.action, "Running migration command");

    // Connect without auto-running migrations for manual control
    let db = Database::open(&config).await?;

    match args.action {
        MigrateAction::Up => {
            tracing::info!("Running pending migrations...");
            db.upgrade().await?;
            tracing::info!("Migrations completed successfully");
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back last migration...");
            db.downgrade().await?;
            tracing::info!("Rollback completed successfully");
        }
        MigrateAction::Status => {
            tracing::info!("Checking migration status...");
            let states = db.migration_states().await?;
            let pending = states.iter().filter(|state| !state.applied).count();
            for state in &states {
                println!("{:<50} {}", state.name, state.label());
            }
            tracing::info!(pending, "Migration status listed");
        }
        MigrateAction::Fresh => {
            tracing::warn!("Resetting database and running all migrations...");
            db.reset().await?;
            tracing::info!("Fresh migrations completed successfully");
        }
    }

    Ok(())
}
