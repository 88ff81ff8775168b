use std::sync::Arc;
use std::time::Duration;

use super::random_token;
use crate::ephemeral::EphemeralStore;
use crate::error::{SocialAccountError, SocialAccountResult};
use crate::models::SelectionData;

pub const SELECTION_TTL: Duration = Duration::from_secs(600);

/// Candidates fetched on callback, waiting for the user to pick one
#[derive(Clone)]
pub struct SelectionCache {
    store: Arc<dyn EphemeralStore>,
}

impl SelectionCache {
    pub fn new(store: Arc<dyn EphemeralStore>) -> Self {
        Self { store }
    }

    fn key(session: &str) -> String {
        format!("oauth:selection:{}", session)
    }

    /// Store under a new session id and return it
    pub async fn put(&self, selection: &SelectionData) -> SocialAccountResult<String> {
        let session = random_token();
        let value = serde_json::to_string(selection).map_err(|e| {
            SocialAccountError::Internal(format!("Failed to serialize selection: {}", e))
        })?;

        self.store
            .put(&Self::key(&session), value, SELECTION_TTL)
            .await?;
        Ok(session)
    }

    /// Read without consuming, so a failed connect can be retried
    pub async fn get(&self, session: &str) -> SocialAccountResult<SelectionData> {
        let value = self
            .store
            .get(&Self::key(session))
            .await?
            .ok_or(SocialAccountError::SessionExpired)?;

        serde_json::from_str(&value).map_err(|e| {
            tracing::warn!(error = %e, "Discarding malformed selection session");
            SocialAccountError::SessionExpired
        })
    }

    pub async fn delete(&self, session: &str) -> SocialAccountResult<()> {
        self.store.delete(&Self::key(session)).await
    }
}
