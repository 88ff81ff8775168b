use oauth2::PkceCodeChallenge;
use std::sync::Arc;
use std::time::Duration;

use super::random_token;
use crate::ephemeral::EphemeralStore;
use crate::error::{SocialAccountError, SocialAccountResult};
use crate::models::OAuthStateData;

/// State tokens live for 10 minutes
pub const STATE_TTL: Duration = Duration::from_secs(600);

/// CSRF state tokens and PKCE verifiers, consumed exactly once
#[derive(Clone)]
pub struct OAuthStateStore {
    store: Arc<dyn EphemeralStore>,
}

impl OAuthStateStore {
    pub fn new(store: Arc<dyn EphemeralStore>) -> Self {
        Self { store }
    }

    fn key(token: &str) -> String {
        format!("oauth:state:{}", token)
    }

    /// Generate a PKCE verifier; the challenge is derived from it at authorize time
    pub fn generate_code_verifier() -> String {
        let (_challenge, verifier) = PkceCodeChallenge::new_random_sha256();
        verifier.secret().clone()
    }

    /// Persist `data` under a fresh random token and return the token
    pub async fn put(&self, data: &OAuthStateData) -> SocialAccountResult<String> {
        let token = random_token();
        let value = serde_json::to_string(data)
            .map_err(|e| SocialAccountError::Internal(format!("Failed to serialize state: {}", e)))?;

        self.store.put(&Self::key(&token), value, STATE_TTL).await?;
        Ok(token)
    }

    /// Atomic read-and-delete; unknown or expired tokens are `SessionExpired`
    pub async fn take(&self, token: &str) -> SocialAccountResult<OAuthStateData> {
        let value = self
            .store
            .take(&Self::key(token))
            .await?
            .ok_or(SocialAccountError::SessionExpired)?;

        serde_json::from_str(&value).map_err(|e| {
            tracing::warn!(error = %e, "Discarding malformed OAuth state");
            SocialAccountError::SessionExpired
        })
    }
}
