use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{SocialAccountError, SocialAccountResult};
use crate::models::{AccountStatus, SocialAccount, UpsertSocialAccount};

/// Persistence for connected social accounts.
///
/// `(workspace_id, platform, external_id)` identifies an account; there is at
/// most one row per key regardless of status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialAccountRepository: Send + Sync {
    /// Create the account, or reactivate a disconnected/removed row with the same key.
    ///
    /// Fails with `AlreadyConnected` when the key is already ACTIVE.
    async fn upsert_from_selection(&self, input: UpsertSocialAccount) -> SocialAccountResult<SocialAccount>;

    async fn get_by_id(&self, id: Uuid) -> SocialAccountResult<Option<SocialAccount>>;

    /// Accounts of a brand that are not removed, newest first
    async fn list_by_brand(&self, brand_id: Uuid) -> SocialAccountResult<Vec<SocialAccount>>;

    async fn set_status(&self, id: Uuid, status: AccountStatus) -> SocialAccountResult<SocialAccount>;

    async fn count_active_by_brand(&self, brand_id: Uuid) -> SocialAccountResult<usize>;
}

/// In-memory implementation of SocialAccountRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemorySocialAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, SocialAccount>>>,
}

impl InMemorySocialAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SocialAccountRepository for InMemorySocialAccountRepository {
    async fn upsert_from_selection(&self, input: UpsertSocialAccount) -> SocialAccountResult<SocialAccount> {
        // Single write lock so two connects for the same key cannot both insert
        let mut accounts = self.accounts.write().await;

        let existing = accounts.values_mut().find(|a| {
            a.workspace_id == input.workspace_id
                && a.platform == input.platform
                && a.external_id == input.external_id
        });

        match existing {
            Some(account) if account.status == AccountStatus::Active => {
                Err(SocialAccountError::AlreadyConnected {
                    platform: input.platform,
                    external_id: input.external_id,
                })
            }
            Some(account) => {
                account.reactivate(input);
                tracing::info!(account_id = %account.id, "Reactivated social account");
                Ok(account.clone())
            }
            None => {
                let account = SocialAccount::new(input);
                accounts.insert(account.id, account.clone());
                tracing::info!(account_id = %account.id, "Created social account");
                Ok(account)
            }
        }
    }

    async fn get_by_id(&self, id: Uuid) -> SocialAccountResult<Option<SocialAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn list_by_brand(&self, brand_id: Uuid) -> SocialAccountResult<Vec<SocialAccount>> {
        let accounts = self.accounts.read().await;
        let mut result: Vec<SocialAccount> = accounts
            .values()
            .filter(|a| a.brand_id == brand_id && a.status != AccountStatus::Removed)
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn set_status(&self, id: Uuid, status: AccountStatus) -> SocialAccountResult<SocialAccount> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| SocialAccountError::AccountNotFound(id.to_string()))?;

        account.status = status;
        account.updated_at = chrono::Utc::now();
        Ok(account.clone())
    }

    async fn count_active_by_brand(&self, brand_id: Uuid) -> SocialAccountResult<usize> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .filter(|a| a.brand_id == brand_id && a.status == AccountStatus::Active)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Platform;

    fn input(workspace_id: Uuid, brand_id: Uuid, external_id: &str) -> UpsertSocialAccount {
        UpsertSocialAccount {
            workspace_id,
            brand_id,
            platform: Platform::Facebook,
            external_id: external_id.to_string(),
            display_name: "Acme".to_string(),
            username: Some("acme".to_string()),
            profile_url: None,
            avatar_url: None,
            credentials_encrypted: "n:c".to_string(),
            platform_data: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn test_active_account_conflicts_and_is_untouched() {
        let repo = InMemorySocialAccountRepository::new();
        let (ws, brand) = (Uuid::now_v7(), Uuid::now_v7());

        let first = repo.upsert_from_selection(input(ws, brand, "123")).await.unwrap();

        let mut second = input(ws, brand, "123");
        second.display_name = "Changed".to_string();
        let err = repo.upsert_from_selection(second).await.unwrap_err();
        assert!(matches!(err, SocialAccountError::AlreadyConnected { .. }));

        let stored = repo.get_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(stored, first);
    }

    #[tokio::test]
    async fn test_removed_account_is_reactivated_in_place() {
        let repo = InMemorySocialAccountRepository::new();
        let (ws, brand) = (Uuid::now_v7(), Uuid::now_v7());

        let first = repo.upsert_from_selection(input(ws, brand, "123")).await.unwrap();
        repo.set_status(first.id, AccountStatus::Removed).await.unwrap();
        assert_eq!(repo.count_active_by_brand(brand).await.unwrap(), 0);

        let mut again = input(ws, brand, "123");
        again.credentials_encrypted = "n2:c2".to_string();
        let reactivated = repo.upsert_from_selection(again).await.unwrap();

        assert_eq!(reactivated.id, first.id);
        assert_eq!(reactivated.status, AccountStatus::Active);
        assert_eq!(reactivated.credentials_encrypted, "n2:c2");
        assert_eq!(repo.count_active_by_brand(brand).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_same_external_id_in_other_workspace_is_separate() {
        let repo = InMemorySocialAccountRepository::new();
        let brand = Uuid::now_v7();

        let a = repo.upsert_from_selection(input(Uuid::now_v7(), brand, "1")).await.unwrap();
        let b = repo.upsert_from_selection(input(Uuid::now_v7(), brand, "1")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_list_by_brand_hides_removed() {
        let repo = InMemorySocialAccountRepository::new();
        let (ws, brand) = (Uuid::now_v7(), Uuid::now_v7());

        let kept = repo.upsert_from_selection(input(ws, brand, "1")).await.unwrap();
        let disconnected = repo.upsert_from_selection(input(ws, brand, "2")).await.unwrap();
        let removed = repo.upsert_from_selection(input(ws, brand, "3")).await.unwrap();
        repo.upsert_from_selection(input(ws, Uuid::now_v7(), "4")).await.unwrap();

        repo.set_status(disconnected.id, AccountStatus::Disconnected).await.unwrap();
        repo.set_status(removed.id, AccountStatus::Removed).await.unwrap();

        let listed: Vec<Uuid> = repo
            .list_by_brand(brand)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(listed.len(), 2);
        assert!(listed.contains(&kept.id));
        assert!(listed.contains(&disconnected.id));
        assert_eq!(repo.count_active_by_brand(brand).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_set_status_unknown_id() {
        let repo = InMemorySocialAccountRepository::new();
        let err = repo
            .set_status(Uuid::now_v7(), AccountStatus::Disconnected)
            .await
            .unwrap_err();
        assert!(matches!(err, SocialAccountError::AccountNotFound(_)));
    }
}
