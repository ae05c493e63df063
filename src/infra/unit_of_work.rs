//! Unit of Work pattern implementation.
//!
//! Centralizes access to the repositories so services depend on a single
//! abstraction. Multi-row writes (a secret and its ownership link, a
//! comment and its parent's timestamp) are committed atomically inside
//! the repositories themselves.

use async_trait::async_trait;
use std::sync::Arc;

use super::db::Database;
use super::repositories::{SecretRepository, SecretStore, UserRepository, UserStore};
use crate::errors::AppResult;

/// Unit of Work trait for dependency injection.
///
/// Implemented by [`Persistence`] for production and by in-memory
/// stores in the integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get secret repository
    fn secrets(&self) -> Arc<dyn SecretRepository>;

    /// Check that the backing store answers
    async fn ping(&self) -> AppResult<()>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: Database,
    user_repo: Arc<UserStore>,
    secret_repo: Arc<SecretStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: Database) -> Self {
        let user_repo = Arc::new(UserStore::new(db.connection()));
        let secret_repo = Arc::new(SecretStore::new(db.connection()));
        Self {
            db,
            user_repo,
            secret_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn secrets(&self) -> Arc<dyn SecretRepository> {
        self.secret_repo.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        self.db.ping().await?;
        Ok(())
    }
}
