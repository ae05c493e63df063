//! Authentication service - Registration and credential checks.
//!
//! Password hashing lives in the domain `Password` value object; this
//! service only orchestrates it against the user repository. Session
//! handling belongs to the HTTP layer.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::validation::EMAIL_TAKEN;
use crate::domain::{FieldErrors, NewUser, NewUserRecord, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Shown when no account matches the submitted email
pub const UNKNOWN_EMAIL: &str = "Cannot find email. Please register for an account.";
/// Shown when the email exists but the password does not match
pub const WRONG_PASSWORD: &str = "Incorrect password.";

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Validate a registration form and create the user
    async fn register(&self, form: NewUser) -> AppResult<User>;

    /// Check credentials and return the matching user
    async fn login(&self, email: &str, password: &str) -> AppResult<User>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, form: NewUser) -> AppResult<User> {
        let registration = form.into_registration()?;

        // The unique index still catches a concurrent duplicate
        if self
            .uow
            .users()
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(AppError::validation(FieldErrors::single("email", EMAIL_TAKEN)));
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUserRecord {
                first_name: registration.first_name,
                last_name: registration.last_name,
                email: registration.email,
                password_hash,
                birthday: registration.birthday,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self
            .uow
            .users()
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::credentials(UNKNOWN_EMAIL))?;

        if !Password::from_hash(user.password_hash.clone()).verify(password) {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AppError::credentials(WRONG_PASSWORD));
        }

        Ok(user)
    }
}
