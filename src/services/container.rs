//! Service Container - Centralized service access.
//!
//! Builds every service over one shared Unit of Work and exposes them
//! as trait objects, plus a small helper for running independent
//! service calls concurrently.

use std::future::Future;
use std::sync::Arc;

use super::{
    AuthService, Authenticator, SecretManager, SecretService, UserManager, UserService,
};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get secret service
    fn secrets(&self) -> Arc<dyn SecretService>;

    /// Get the underlying store (health checks)
    fn store(&self) -> Arc<dyn UnitOfWork>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    secret_service: Arc<dyn SecretService>,
    store: Arc<dyn UnitOfWork>,
}

impl Services {
    /// Create a service container over the given Unit of Work
    pub fn new<U: UnitOfWork + 'static>(uow: Arc<U>) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone())),
            user_service: Arc::new(UserManager::new(uow.clone())),
            secret_service: Arc::new(SecretManager::new(uow.clone())),
            store: uow,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn secrets(&self) -> Arc<dyn SecretService> {
        self.secret_service.clone()
    }

    fn store(&self) -> Arc<dyn UnitOfWork> {
        self.store.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// If either operation fails, the error is returned immediately.
    ///
    /// # Example
    /// ```ignore
    /// let (user, secrets) = parallel::join2(
    ///     state.users.current_user(&email),
    ///     state.secrets.list(),
    /// ).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }
}
