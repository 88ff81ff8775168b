use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000000_create_workspaces::Workspaces;
use crate::m20250301_000001_create_brands::Brands;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SocialAccounts::Table)
                    .if_not_exists()
                    .col(pk_uuid(SocialAccounts::Id))
                    .col(uuid(SocialAccounts::WorkspaceId))
                    .col(uuid(SocialAccounts::BrandId))
                    // facebook | instagram | tiktok | linkedin | x | pinterest | youtube
                    .col(string(SocialAccounts::Platform))
                    .col(string(SocialAccounts::ExternalId))
                    .col(string(SocialAccounts::DisplayName))
                    .col(string_null(SocialAccounts::Username))
                    .col(text_null(SocialAccounts::ProfileUrl))
                    .col(text_null(SocialAccounts::AvatarUrl))
                    // active | disconnected | removed
                    .col(string(SocialAccounts::Status).default("active"))
                    .col(text(SocialAccounts::CredentialsEncrypted))
                    .col(json_binary(SocialAccounts::PlatformData).default("{}"))
                    .col(
                        timestamp_with_time_zone(SocialAccounts::ConnectedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(SocialAccounts::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(SocialAccounts::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_social_accounts_workspace_id")
                            .from(SocialAccounts::Table, SocialAccounts::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_social_accounts_brand_id")
                            .from(SocialAccounts::Table, SocialAccounts::BrandId)
                            .to(Brands::Table, Brands::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per platform identity within a workspace, whatever its status
        manager
            .create_index(
                Index::create()
                    .name("idx_social_accounts_workspace_platform_external")
                    .table(SocialAccounts::Table)
                    .col(SocialAccounts::WorkspaceId)
                    .col(SocialAccounts::Platform)
                    .col(SocialAccounts::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_social_accounts_brand_status")
                    .table(SocialAccounts::Table)
                    .col(SocialAccounts::BrandId)
                    .col(SocialAccounts::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SocialAccounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SocialAccounts {
    Table,
    Id,
    WorkspaceId,
    BrandId,
    Platform,
    ExternalId,
    DisplayName,
    Username,
    ProfileUrl,
    AvatarUrl,
    Status,
    CredentialsEncrypted,
    PlatformData,
    ConnectedAt,
    CreatedAt,
    UpdatedAt,
}
