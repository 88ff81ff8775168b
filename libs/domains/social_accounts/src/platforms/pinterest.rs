use async_trait::async_trait;
use oauth2::AuthType;
use serde::Deserialize;

use super::{PlatformAdapter, PlatformConfig, PlatformEndpoints, default_http_client, send_json};
use crate::error::{SocialAccountError, SocialAccountResult};
use crate::models::{AccountCandidate, Platform, PlatformToken};

pub fn default_endpoints() -> PlatformEndpoints {
    PlatformEndpoints::new(
        "https://www.pinterest.com/oauth/",
        "https://api.pinterest.com/v5/oauth/token",
        "https://api.pinterest.com",
    )
}

pub struct PinterestAdapter {
    config: PlatformConfig,
    http_client: reqwest::Client,
}

impl PinterestAdapter {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            http_client: default_http_client(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserAccount {
    id: Option<String>,
    username: Option<String>,
    business_name: Option<String>,
    profile_image: Option<String>,
    account_type: Option<String>,
}

#[async_trait]
impl PlatformAdapter for PinterestAdapter {
    fn platform(&self) -> Platform {
        Platform::Pinterest
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Pinterest expects a single comma separated scope parameter
    fn scopes(&self) -> &'static [&'static str] {
        &["boards:read,pins:read,pins:write,user_accounts:read"]
    }

    fn client_auth(&self) -> AuthType {
        AuthType::BasicAuth
    }

    async fn fetch_accounts(&self, token: &PlatformToken) -> SocialAccountResult<Vec<AccountCandidate>> {
        let url = format!("{}/v5/user_account", self.config.endpoints.api_base);
        let account: UserAccount = send_json(
            Platform::Pinterest,
            self.http_client.get(url).bearer_auth(&token.access_token),
        )
        .await?;

        let external_id = account
            .id
            .clone()
            .or_else(|| account.username.clone())
            .ok_or_else(|| SocialAccountError::upstream(Platform::Pinterest, "Missing account id"))?;

        let display_name = account
            .business_name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| account.username.clone())
            .unwrap_or_else(|| external_id.clone());

        Ok(vec![AccountCandidate {
            profile_url: account
                .username
                .as_ref()
                .map(|u| format!("https://www.pinterest.com/{}/", u)),
            platform_data: serde_json::json!({ "account_type": account.account_type }),
            external_id,
            display_name,
            username: account.username,
            avatar_url: account.profile_image,
            access_token: None,
        }])
    }
}
