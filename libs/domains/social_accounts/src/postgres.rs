use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;

use crate::brands::BrandRepository;
use crate::entity::{brand, social_account};
use crate::error::{SocialAccountError, SocialAccountResult};
use crate::models::{AccountStatus, Brand, SocialAccount, UpsertSocialAccount};
use crate::repository::SocialAccountRepository;

fn db_error(e: DbErr) -> SocialAccountError {
    SocialAccountError::Internal(format!("Database error: {}", e))
}

pub struct PgSocialAccountRepository {
    db: DatabaseConnection,
}

impl PgSocialAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Revive an inactive row in place.
    ///
    /// The update only matches while the row is still inactive, so of two
    /// concurrent connects for the same key exactly one wins and the other
    /// gets `AlreadyConnected`.
    async fn reactivate(
        &self,
        model: social_account::Model,
        input: UpsertSocialAccount,
    ) -> SocialAccountResult<SocialAccount> {
        let now = chrono::Utc::now();
        let changes = social_account::ActiveModel {
            brand_id: Set(input.brand_id),
            display_name: Set(input.display_name),
            username: Set(input.username),
            profile_url: Set(input.profile_url),
            avatar_url: Set(input.avatar_url),
            credentials_encrypted: Set(input.credentials_encrypted),
            platform_data: Set(input.platform_data),
            status: Set(AccountStatus::Active),
            connected_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let result = social_account::Entity::update_many()
            .set(changes)
            .filter(social_account::Column::Id.eq(model.id))
            .filter(social_account::Column::Status.ne(AccountStatus::Active))
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(SocialAccountError::AlreadyConnected {
                platform: input.platform,
                external_id: input.external_id,
            });
        }

        let updated = social_account::Entity::find_by_id(model.id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or_else(|| SocialAccountError::AccountNotFound(model.id.to_string()))?;

        tracing::info!(account_id = %updated.id, "Reactivated social account");
        Ok(updated.into())
    }
}

#[async_trait]
impl SocialAccountRepository for PgSocialAccountRepository {
    async fn upsert_from_selection(&self, input: UpsertSocialAccount) -> SocialAccountResult<SocialAccount> {
        let existing = social_account::Entity::find()
            .filter(social_account::Column::WorkspaceId.eq(input.workspace_id))
            .filter(social_account::Column::Platform.eq(input.platform))
            .filter(social_account::Column::ExternalId.eq(input.external_id.as_str()))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        match existing {
            Some(model) if model.status == AccountStatus::Active => {
                Err(SocialAccountError::AlreadyConnected {
                    platform: input.platform,
                    external_id: input.external_id,
                })
            }
            Some(model) => self.reactivate(model, input).await,
            None => {
                let platform = input.platform;
                let external_id = input.external_id.clone();
                let active: social_account::ActiveModel = input.into();

                // A concurrent connect may have inserted the same key since the lookup
                let model = active.insert(&self.db).await.map_err(|e| match e.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        SocialAccountError::AlreadyConnected {
                            platform,
                            external_id,
                        }
                    }
                    _ => db_error(e),
                })?;

                tracing::info!(account_id = %model.id, %platform, "Created social account");
                Ok(model.into())
            }
        }
    }

    async fn get_by_id(&self, id: Uuid) -> SocialAccountResult<Option<SocialAccount>> {
        let model = social_account::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn list_by_brand(&self, brand_id: Uuid) -> SocialAccountResult<Vec<SocialAccount>> {
        let models = social_account::Entity::find()
            .filter(social_account::Column::BrandId.eq(brand_id))
            .filter(social_account::Column::Status.ne(AccountStatus::Removed))
            .order_by_desc(social_account::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn set_status(&self, id: Uuid, status: AccountStatus) -> SocialAccountResult<SocialAccount> {
        let model = social_account::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or_else(|| SocialAccountError::AccountNotFound(id.to_string()))?;

        let mut active: social_account::ActiveModel = model.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&self.db).await.map_err(db_error)?;
        tracing::info!(account_id = %id, %status, "Updated social account status");
        Ok(updated.into())
    }

    async fn count_active_by_brand(&self, brand_id: Uuid) -> SocialAccountResult<usize> {
        let count = social_account::Entity::find()
            .filter(social_account::Column::BrandId.eq(brand_id))
            .filter(social_account::Column::Status.eq(AccountStatus::Active))
            .count(&self.db)
            .await
            .map_err(db_error)?;

        Ok(count as usize)
    }
}

pub struct PgBrandRepository {
    db: DatabaseConnection,
}

impl PgBrandRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BrandRepository for PgBrandRepository {
    async fn get_by_id(&self, id: Uuid) -> SocialAccountResult<Option<Brand>> {
        let model = brand::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn update_readiness(
        &self,
        id: Uuid,
        readiness_score: i32,
        ready_to_publish: bool,
    ) -> SocialAccountResult<Brand> {
        let model = brand::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(SocialAccountError::BrandNotFound(id))?;

        let mut active: brand::ActiveModel = model.into();
        active.readiness_score = Set(readiness_score);
        active.ready_to_publish = Set(ready_to_publish);
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&self.db).await.map_err(db_error)?;
        tracing::debug!(brand_id = %id, readiness_score, ready_to_publish, "Updated brand readiness");
        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Platform;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn account_model(status: AccountStatus) -> social_account::Model {
        let now = chrono::Utc::now();
        social_account::Model {
            id: Uuid::now_v7(),
            workspace_id: Uuid::now_v7(),
            brand_id: Uuid::now_v7(),
            platform: Platform::Facebook,
            external_id: "123".to_string(),
            display_name: "Acme".to_string(),
            username: Some("acme".to_string()),
            profile_url: None,
            avatar_url: None,
            status,
            credentials_encrypted: "n:c".to_string(),
            platform_data: serde_json::json!({}),
            connected_at: now.into(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn upsert_for(model: &social_account::Model) -> UpsertSocialAccount {
        UpsertSocialAccount {
            workspace_id: model.workspace_id,
            brand_id: model.brand_id,
            platform: model.platform,
            external_id: model.external_id.clone(),
            display_name: "Acme Inc".to_string(),
            username: Some("acme".to_string()),
            profile_url: None,
            avatar_url: None,
            credentials_encrypted: "n2:c2".to_string(),
            platform_data: serde_json::json!({"page_id": "123"}),
        }
    }

    #[tokio::test]
    async fn test_upsert_rejects_active_account() {
        let existing = account_model(AccountStatus::Active);
        let input = upsert_for(&existing);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing]])
            .into_connection();

        let repo = PgSocialAccountRepository::new(db);
        let err = repo.upsert_from_selection(input).await.unwrap_err();

        assert!(matches!(err, SocialAccountError::AlreadyConnected { .. }));
    }

    #[tokio::test]
    async fn test_upsert_reactivates_removed_account() {
        let existing = account_model(AccountStatus::Removed);
        let input = upsert_for(&existing);
        let mut reactivated = existing.clone();
        reactivated.status = AccountStatus::Active;
        reactivated.display_name = "Acme Inc".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing.clone()], vec![reactivated]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = PgSocialAccountRepository::new(db);
        let account = repo.upsert_from_selection(input).await.unwrap();

        assert_eq!(account.id, existing.id);
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(account.display_name, "Acme Inc");
    }

    #[tokio::test]
    async fn test_reactivation_lost_to_concurrent_connect_is_conflict() {
        let existing = account_model(AccountStatus::Disconnected);
        let input = upsert_for(&existing);

        // The row was seen inactive, but another connect activated it before the update
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PgSocialAccountRepository::new(db);
        let err = repo.upsert_from_selection(input).await.unwrap_err();

        assert!(matches!(
            err,
            SocialAccountError::AlreadyConnected { ref external_id, .. } if external_id == "123"
        ));
    }

    #[tokio::test]
    async fn test_upsert_inserts_new_account() {
        let created = account_model(AccountStatus::Active);
        let input = upsert_for(&created);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<social_account::Model>::new(), vec![created.clone()]])
            .into_connection();

        let repo = PgSocialAccountRepository::new(db);
        let account = repo.upsert_from_selection(input).await.unwrap();

        assert_eq!(account.id, created.id);
        assert_eq!(account.status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn test_set_status_missing_account() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<social_account::Model>::new()])
            .into_connection();

        let repo = PgSocialAccountRepository::new(db);
        let err = repo
            .set_status(Uuid::now_v7(), AccountStatus::Disconnected)
            .await
            .unwrap_err();

        assert!(matches!(err, SocialAccountError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_readiness() {
        let now = chrono::Utc::now();
        let model = brand::Model {
            id: Uuid::now_v7(),
            workspace_id: Uuid::now_v7(),
            name: "Acme".to_string(),
            description: None,
            logo_url: None,
            website: None,
            readiness_score: 0,
            ready_to_publish: false,
            created_at: now.into(),
            updated_at: now.into(),
        };
        let mut updated = model.clone();
        updated.readiness_score = 50;
        updated.ready_to_publish = true;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model.clone()], vec![updated]])
            .into_connection();

        let repo = PgBrandRepository::new(db);
        let brand = repo.update_readiness(model.id, 50, true).await.unwrap();

        assert_eq!(brand.readiness_score, 50);
        assert!(brand.ready_to_publish);
    }

    #[tokio::test]
    #[ignore] // needs docker
    async fn test_postgres_round_trip() {
        let db = test_utils::TestDatabase::new().await;
        let workspace_id = Uuid::now_v7();
        let brand_id = Uuid::now_v7();
        db.create_workspace(workspace_id).await;
        db.create_brand(workspace_id, brand_id, "Acme").await;

        let repo = PgSocialAccountRepository::new(db.connection());
        let input = UpsertSocialAccount {
            workspace_id,
            brand_id,
            platform: Platform::Youtube,
            external_id: "UC123".to_string(),
            display_name: "Acme TV".to_string(),
            username: None,
            profile_url: None,
            avatar_url: None,
            credentials_encrypted: "n:c".to_string(),
            platform_data: serde_json::json!({}),
        };

        let created = repo.upsert_from_selection(input.clone()).await.unwrap();
        assert_eq!(repo.count_active_by_brand(brand_id).await.unwrap(), 1);

        assert!(matches!(
            repo.upsert_from_selection(input.clone()).await,
            Err(SocialAccountError::AlreadyConnected { .. })
        ));

        repo.set_status(created.id, AccountStatus::Removed).await.unwrap();
        assert!(repo.list_by_brand(brand_id).await.unwrap().is_empty());

        let again = repo.upsert_from_selection(input).await.unwrap();
        assert_eq!(again.id, created.id);
        assert_eq!(again.status, AccountStatus::Active);
    }
}
