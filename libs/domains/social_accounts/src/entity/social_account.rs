use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{AccountStatus, Platform, SocialAccount, UpsertSocialAccount};

/// Sea-ORM Entity for the social_accounts table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "social_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub brand_id: Uuid,
    pub platform: Platform,
    pub external_id: String,
    pub display_name: String,
    pub username: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub profile_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub avatar_url: Option<String>,
    pub status: AccountStatus,
    #[sea_orm(column_type = "Text")]
    pub credentials_encrypted: String,
    pub platform_data: Json,
    pub connected_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SocialAccount {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            workspace_id: model.workspace_id,
            brand_id: model.brand_id,
            platform: model.platform,
            external_id: model.external_id,
            display_name: model.display_name,
            username: model.username,
            profile_url: model.profile_url,
            avatar_url: model.avatar_url,
            status: model.status,
            credentials_encrypted: model.credentials_encrypted,
            platform_data: model.platform_data,
            connected_at: model.connected_at.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<UpsertSocialAccount> for ActiveModel {
    fn from(input: UpsertSocialAccount) -> Self {
        let now = chrono::Utc::now();
        ActiveModel {
            id: Set(Uuid::now_v7()),
            workspace_id: Set(input.workspace_id),
            brand_id: Set(input.brand_id),
            platform: Set(input.platform),
            external_id: Set(input.external_id),
            display_name: Set(input.display_name),
            username: Set(input.username),
            profile_url: Set(input.profile_url),
            avatar_url: Set(input.avatar_url),
            status: Set(AccountStatus::Active),
            credentials_encrypted: Set(input.credentials_encrypted),
            platform_data: Set(input.platform_data),
            connected_at: Set(now.into()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}
