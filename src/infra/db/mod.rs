//! Postgres connection shared by the repositories and the session store.

use sea_orm::{Database as SeaDatabase, DatabaseConnection, DbErr};
use sea_orm_migration::{MigrationStatus, MigratorTrait};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::Config;

pub mod migrations;

pub use migrations::Migrator;

/// One schema migration and whether it has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationState {
    pub name: String,
    pub applied: bool,
}

impl MigrationState {
    pub fn label(&self) -> &'static str {
        if self.applied {
            "applied"
        } else {
            "pending"
        }
    }
}

#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the pool and bring the schema up to date.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let db = Self::open(config).await?;
        Migrator::up(&db.connection, None).await.inspect_err(|e| {
            tracing::error!("Failed to run migrations: {}", e);
        })?;

        tracing::info!("Database connected and migrations applied");
        Ok(db)
    }

    /// Open the pool and leave the schema alone; `migrate` drives it by hand.
    pub async fn open(config: &Config) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(&config.database_url).await?;
        Ok(Self { connection })
    }

    pub fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Postgres-backed session store on the same pool, with its table created.
    pub async fn session_store(&self) -> Result<PostgresStore, DbErr> {
        let store = PostgresStore::new(self.connection.get_postgres_connection_pool().clone());
        store
            .migrate()
            .await
            .map_err(|e| DbErr::Custom(format!("session table: {}", e)))?;
        Ok(store)
    }

    pub async fn upgrade(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Undo the most recent migration only.
    pub async fn downgrade(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Drop every table, then apply all migrations again.
    pub async fn reset(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    pub async fn migration_states(&self) -> Result<Vec<MigrationState>, DbErr> {
        let states = Migrator::get_migration_with_status(&self.connection)
            .await?
            .iter()
            .map(|m| MigrationState {
                name: m.name().to_string(),
                applied: matches!(m.status(), MigrationStatus::Applied),
            })
            .collect();
        Ok(states)
    }

    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection.ping().await
    }
}
