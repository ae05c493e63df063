//! User repository: lookup by email and creation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};
use uuid::Uuid;

use super::entities::{user, user_secret};
use crate::domain::validation::EMAIL_TAKEN;
use crate::domain::{FieldErrors, NewUserRecord, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by email, with their secret ids in posting order
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user.
    ///
    /// A duplicate email is reported as an `email` field error.
    async fn create(&self, record: NewUserRecord) -> AppResult<User>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn secret_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        let links = user_secret::Entity::find()
            .filter(user_secret::Column::UserId.eq(user_id))
            .order_by_asc(user_secret::Column::Position)
            .order_by_asc(user_secret::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(links.into_iter().map(|link| link.secret_id).collect())
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(model) = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let secrets = self.secret_ids(model.id).await?;
        Ok(Some(model.into_user(secrets)))
    }

    async fn create(&self, record: NewUserRecord) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(record.first_name),
            last_name: Set(record.last_name),
            email: Set(record.email),
            password_hash: Set(record.password_hash),
            birthday: Set(record.birthday),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(model.into_user(Vec::new())),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AppError::Validation(FieldErrors::single("email", EMAIL_TAKEN)))
            }
            Err(e) => Err(AppError::from(e)),
        }
    }
}
