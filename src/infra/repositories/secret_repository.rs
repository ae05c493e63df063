//! Secret repository: secrets, their comments, and ownership links.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{comment, secret, user, user_secret};
use crate::domain::{Comment, Secret};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Secret repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SecretRepository: Send + Sync {
    /// All secrets, most recently created first, each with its comments
    async fn list_newest_first(&self) -> AppResult<Vec<Secret>>;

    /// One secret with its comments
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Secret>>;

    /// Whether a secret with this id is stored
    async fn exists(&self, id: Uuid) -> AppResult<bool>;

    /// Insert a secret and append it to the owner's list atomically
    async fn create_for_user(&self, user_id: Uuid, content: String) -> AppResult<Secret>;

    /// Append a comment; `NotFound` if the secret does not exist
    async fn add_comment(&self, secret_id: Uuid, content: String) -> AppResult<Comment>;

    /// Delete a secret with its comments and ownership link.
    /// Deleting an absent id succeeds.
    async fn delete_by_id(&self, id: Uuid) -> AppResult<()>;

    /// Whether the secret is on the user's list
    async fn is_owned_by(&self, secret_id: Uuid, user_id: Uuid) -> AppResult<bool>;
}

/// Slot after the highest one taken; a user's first secret gets 0
fn next_position(highest: Option<i32>) -> AppResult<i32> {
    match highest {
        None => Ok(0),
        Some(position) => position
            .checked_add(1)
            .ok_or_else(|| AppError::internal("secret list position overflow")),
    }
}

/// SeaORM-backed secret repository
pub struct SecretStore {
    db: DatabaseConnection,
}

impl SecretStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SecretRepository for SecretStore {
    async fn list_newest_first(&self) -> AppResult<Vec<Secret>> {
        let secrets = secret::Entity::find()
            .order_by_desc(secret::Column::CreatedAt)
            .order_by_desc(secret::Column::Id)
            .all(&self.db)
            .await?;

        let comments = secrets
            .load_many(
                comment::Entity::find().order_by_asc(comment::Column::CreatedAt),
                &self.db,
            )
            .await?;

        Ok(secrets
            .into_iter()
            .zip(comments)
            .map(|(model, comments)| model.into_secret(comments))
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Secret>> {
        let Some(model) = secret::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let comments = model
            .find_related(comment::Entity)
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(Some(model.into_secret(comments)))
    }

    async fn exists(&self, id: Uuid) -> AppResult<bool> {
        let count = secret::Entity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn create_for_user(&self, user_id: Uuid, content: String) -> AppResult<Secret> {
        // Dropping `txn` without commit rolls back
        let txn = self.db.begin().await?;
        let now = Utc::now();

        // Row lock on the owner serializes concurrent posts to one list
        user::Entity::find_by_id(user_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let highest = user_secret::Entity::find()
            .select_only()
            .column_as(user_secret::Column::Position.max(), "highest")
            .filter(user_secret::Column::UserId.eq(user_id))
            .into_tuple::<Option<i32>>()
            .one(&txn)
            .await?
            .flatten();
        let position = next_position(highest)?;

        let model = secret::ActiveModel {
            id: Set(Uuid::new_v4()),
            content: Set(content),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        user_secret::ActiveModel {
            user_id: Set(user_id),
            secret_id: Set(model.id),
            position: Set(position),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(model.into_secret(Vec::new()))
    }

    async fn add_comment(&self, secret_id: Uuid, content: String) -> AppResult<Comment> {
        let txn = self.db.begin().await?;

        let parent = secret::Entity::find_by_id(secret_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let now = Utc::now();
        let model = comment::ActiveModel {
            id: Set(Uuid::new_v4()),
            secret_id: Set(secret_id),
            content: Set(content),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut parent: secret::ActiveModel = parent.into();
        parent.updated_at = Set(now);
        parent.update(&txn).await?;

        txn.commit().await?;
        Ok(Comment::from(model))
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<()> {
        // Comments and ownership links go with it (ON DELETE CASCADE)
        let result = secret::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::debug!(secret_id = %id, rows = result.rows_affected, "Secret delete executed");
        Ok(())
    }

    async fn is_owned_by(&self, secret_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let link = user_secret::Entity::find_by_id((user_id, secret_id))
            .one(&self.db)
            .await?;
        Ok(link.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_secret_takes_position_zero() {
        assert_eq!(next_position(None).unwrap(), 0);
    }

    #[test]
    fn test_next_position_follows_highest_not_count() {
        // Positions 0 and 3 survive after 1 and 2 were deleted
        assert_eq!(next_position(Some(3)).unwrap(), 4);
    }

    #[test]
    fn test_next_position_overflow_is_internal_error() {
        let err = next_position(Some(i32::MAX)).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
