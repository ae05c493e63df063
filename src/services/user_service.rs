//! User service - Resolves the signed-in user.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::User;
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Load the user a session points at.
    ///
    /// A session email that no longer resolves is `Unauthorized`.
    async fn current_user(&self, email: &str) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn current_user(&self, email: &str) -> AppResult<User> {
        match self.uow.users().find_by_email(email).await? {
            Some(user) => Ok(user),
            None => {
                tracing::warn!("Session refers to an unknown user");
                Err(AppError::Unauthorized)
            }
        }
    }
}
