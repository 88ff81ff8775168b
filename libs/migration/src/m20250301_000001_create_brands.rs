use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000000_create_workspaces::Workspaces;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Brands::Table)
                    .if_not_exists()
                    .col(pk_uuid(Brands::Id))
                    .col(uuid(Brands::WorkspaceId))
                    .col(string(Brands::Name))
                    .col(text_null(Brands::Description))
                    .col(text_null(Brands::LogoUrl))
                    .col(string_null(Brands::Website))
                    .col(integer(Brands::ReadinessScore).default(0))
                    .col(boolean(Brands::ReadyToPublish).default(false))
                    .col(
                        timestamp_with_time_zone(Brands::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Brands::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_brands_workspace_id")
                            .from(Brands::Table, Brands::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_brands_workspace_id")
                    .table(Brands::Table)
                    .col(Brands::WorkspaceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Brands::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Brands {
    Table,
    Id,
    WorkspaceId,
    Name,
    Description,
    LogoUrl,
    Website,
    ReadinessScore,
    ReadyToPublish,
    CreatedAt,
    UpdatedAt,
}
