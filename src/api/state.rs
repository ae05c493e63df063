//! Application state - Dependency injection container.
//!
//! Provides handlers with the application services and the store used
//! by the health check.

use std::sync::Arc;

use crate::infra::{Database, Persistence, UnitOfWork};
use crate::services::{AuthService, SecretService, ServiceContainer, Services, UserService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Secret service
    pub secret_service: Arc<dyn SecretService>,
    /// Backing store
    pub store: Arc<dyn UnitOfWork>,
}

impl AppState {
    /// Create application state over a connected database.
    pub fn from_database(database: Database) -> Self {
        Self::from_container(&Services::new(Arc::new(Persistence::new(database))))
    }

    /// Create application state from any service container.
    pub fn from_container(container: &impl ServiceContainer) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            secret_service: container.secrets(),
            store: container.store(),
        }
    }
}
