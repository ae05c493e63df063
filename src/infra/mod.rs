//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection and migrations
//! - Repositories over the SeaORM entities
//! - Unit of Work for repository access

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, MigrationState, Migrator};
pub use repositories::{SecretRepository, SecretStore, UserRepository, UserStore};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockSecretRepository, MockUserRepository};
