//! Secret service - Posting, commenting and deleting secrets.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Comment, NewComment, NewSecret, Secret};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Secret service trait for dependency injection.
#[async_trait]
pub trait SecretService: Send + Sync {
    /// Every secret, newest first
    async fn list(&self) -> AppResult<Vec<Secret>>;

    /// One secret with its comments
    async fn get(&self, id: Uuid) -> AppResult<Secret>;

    /// Validate and store a secret owned by `owner_id`
    async fn post(&self, owner_id: Uuid, form: NewSecret) -> AppResult<Secret>;

    /// Append a comment to a secret.
    ///
    /// A missing secret is `NotFound` before the comment is validated.
    async fn comment(&self, secret_id: Uuid, form: NewComment) -> AppResult<Comment>;

    /// Delete a secret the user owns.
    ///
    /// An absent id succeeds; an id owned by someone else is `Forbidden`.
    async fn delete(&self, secret_id: Uuid, user_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of SecretService using Unit of Work.
pub struct SecretManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> SecretManager<U> {
    /// Create new secret service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> SecretService for SecretManager<U> {
    async fn list(&self) -> AppResult<Vec<Secret>> {
        self.uow.secrets().list_newest_first().await
    }

    async fn get(&self, id: Uuid) -> AppResult<Secret> {
        self.uow.secrets().find_by_id(id).await?.ok_or_not_found()
    }

    async fn post(&self, owner_id: Uuid, form: NewSecret) -> AppResult<Secret> {
        let content = form.into_content()?;
        let secret = self.uow.secrets().create_for_user(owner_id, content).await?;
        tracing::info!(secret_id = %secret.id, user_id = %owner_id, "Secret posted");
        Ok(secret)
    }

    async fn comment(&self, secret_id: Uuid, form: NewComment) -> AppResult<Comment> {
        let secrets = self.uow.secrets();
        if !secrets.exists(secret_id).await? {
            return Err(AppError::NotFound);
        }

        let content = form.into_content()?;
        secrets.add_comment(secret_id, content).await
    }

    async fn delete(&self, secret_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let secrets = self.uow.secrets();

        if !secrets.is_owned_by(secret_id, user_id).await? {
            if !secrets.exists(secret_id).await? {
                return Ok(());
            }
            tracing::warn!(%secret_id, %user_id, "Refused to delete a secret owned by someone else");
            return Err(AppError::Forbidden);
        }

        secrets.delete_by_id(secret_id).await?;
        tracing::info!(%secret_id, %user_id, "Secret deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockSecretRepository, MockUserRepository, SecretRepository, UserRepository};
    use chrono::Utc;
    use mockall::predicate::eq;

    struct TestUnitOfWork {
        secret_repo: Arc<MockSecretRepository>,
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            Arc::new(MockUserRepository::new())
        }

        fn secrets(&self) -> Arc<dyn SecretRepository> {
            self.secret_repo.clone()
        }

        async fn ping(&self) -> AppResult<()> {
            Ok(())
        }
    }

    fn service(repo: MockSecretRepository) -> SecretManager<TestUnitOfWork> {
        SecretManager::new(Arc::new(TestUnitOfWork {
            secret_repo: Arc::new(repo),
        }))
    }

    fn secret(id: Uuid, content: &str) -> Secret {
        Secret {
            id,
            content: content.to_string(),
            comments: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_post_short_secret_writes_nothing() {
        let mut repo = MockSecretRepository::new();
        repo.expect_create_for_user().never();

        let form = NewSecret {
            secret: Some("abc".to_string()),
        };
        let err = service(repo).post(Uuid::new_v4(), form).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_post_secret() {
        let owner = Uuid::new_v4();
        let mut repo = MockSecretRepository::new();
        repo.expect_create_for_user()
            .with(eq(owner), eq("I talk to my plants".to_string()))
            .times(1)
            .returning(|_, content| Ok(secret(Uuid::new_v4(), &content)));

        let form = NewSecret {
            secret: Some("I talk to my plants".to_string()),
        };
        let posted = service(repo).post(owner, form).await.unwrap();
        assert_eq!(posted.content, "I talk to my plants");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut repo = MockSecretRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let err = service(repo).get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_owned_secret() {
        let id = Uuid::new_v4();
        let mut repo = MockSecretRepository::new();
        repo.expect_is_owned_by().returning(|_, _| Ok(true));
        repo.expect_delete_by_id().with(eq(id)).times(1).returning(|_| Ok(()));

        assert!(service(repo).delete(id, Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_someone_elses_secret_is_forbidden() {
        let id = Uuid::new_v4();
        let mut repo = MockSecretRepository::new();
        repo.expect_is_owned_by().returning(|_, _| Ok(false));
        repo.expect_exists().with(eq(id)).returning(|_| Ok(true));
        repo.expect_delete_by_id().never();

        let err = service(repo).delete(id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_delete_absent_secret_is_noop() {
        let mut repo = MockSecretRepository::new();
        repo.expect_is_owned_by().returning(|_, _| Ok(false));
        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_delete_by_id().never();

        assert!(service(repo).delete(Uuid::new_v4(), Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_comment_on_missing_secret() {
        let mut repo = MockSecretRepository::new();
        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_add_comment().never();

        let form = NewComment {
            comment: Some("me too honestly".to_string()),
        };
        let err = service(repo).comment(Uuid::new_v4(), form).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_short_comment_on_missing_secret_is_not_found() {
        let mut repo = MockSecretRepository::new();
        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_add_comment().never();

        let form = NewComment {
            comment: Some("ok".to_string()),
        };
        let err = service(repo).comment(Uuid::new_v4(), form).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_short_comment_on_existing_secret_is_validation() {
        let id = Uuid::new_v4();
        let mut repo = MockSecretRepository::new();
        repo.expect_exists().with(eq(id)).returning(|_| Ok(true));
        repo.expect_add_comment().never();

        let form = NewComment {
            comment: Some("ok".to_string()),
        };
        let err = service(repo).comment(id, form).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
