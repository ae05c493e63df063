//! Migration: Create secrets, comments and the user/secret link table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Secrets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Secrets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Secrets::Content).text().not_null())
                    .col(
                        ColumnDef::new(Secrets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Secrets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_secrets_created_at")
                    .table(Secrets::Table)
                    .col(Secrets::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Comments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Comments::SecretId).uuid().not_null())
                    .col(ColumnDef::new(Comments::Content).text().not_null())
                    .col(
                        ColumnDef::new(Comments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Comments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_secret")
                            .from(Comments::Table, Comments::SecretId)
                            .to(Secrets::Table, Secrets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_secret_id")
                    .table(Comments::Table)
                    .col(Comments::SecretId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserSecrets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserSecrets::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserSecrets::SecretId).uuid().not_null())
                    .col(ColumnDef::new(UserSecrets::Position).integer().not_null())
                    .col(
                        ColumnDef::new(UserSecrets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserSecrets::UserId)
                            .col(UserSecrets::SecretId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_secrets_user")
                            .from(UserSecrets::Table, UserSecrets::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_secrets_secret")
                            .from(UserSecrets::Table, UserSecrets::SecretId)
                            .to(Secrets::Table, Secrets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserSecrets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Secrets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Secrets {
    Table,
    Id,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Comments {
    Table,
    Id,
    SecretId,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum UserSecrets {
    Table,
    UserId,
    SecretId,
    Position,
    CreatedAt,
}
