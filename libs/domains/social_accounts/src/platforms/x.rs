use async_trait::async_trait;
use oauth2::AuthType;
use serde::Deserialize;

use super::{PlatformAdapter, PlatformConfig, PlatformEndpoints, default_http_client, send_json};
use crate::error::{SocialAccountError, SocialAccountResult};
use crate::models::{AccountCandidate, Platform, PlatformToken};

pub fn default_endpoints() -> PlatformEndpoints {
    PlatformEndpoints::new(
        "https://twitter.com/i/oauth2/authorize",
        "https://api.twitter.com/2/oauth2/token",
        "https://api.twitter.com",
    )
}

/// X (Twitter) OAuth 2.0 with PKCE and HTTP basic client authentication
pub struct XAdapter {
    config: PlatformConfig,
    http_client: reqwest::Client,
}

impl XAdapter {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            http_client: default_http_client(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UsersMe {
    data: Option<XUser>,
}

#[derive(Debug, Deserialize)]
struct XUser {
    id: String,
    name: String,
    username: String,
    profile_image_url: Option<String>,
}

#[async_trait]
impl PlatformAdapter for XAdapter {
    fn platform(&self) -> Platform {
        Platform::X
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    fn scopes(&self) -> &'static [&'static str] {
        &["tweet.read", "tweet.write", "users.read", "offline.access"]
    }

    fn uses_pkce(&self) -> bool {
        true
    }

    fn client_auth(&self) -> AuthType {
        AuthType::BasicAuth
    }

    async fn fetch_accounts(&self, token: &PlatformToken) -> SocialAccountResult<Vec<AccountCandidate>> {
        let url = format!("{}/2/users/me", self.config.endpoints.api_base);
        let me: UsersMe = send_json(
            Platform::X,
            self.http_client
                .get(url)
                .query(&[("user.fields", "profile_image_url,username,name")])
                .bearer_auth(&token.access_token),
        )
        .await?;

        let user = me
            .data
            .ok_or_else(|| SocialAccountError::upstream(Platform::X, "Missing user data"))?;

        Ok(vec![AccountCandidate {
            profile_url: Some(format!("https://x.com/{}", user.username)),
            platform_data: serde_json::json!({}),
            external_id: user.id,
            display_name: user.name,
            username: Some(user.username),
            avatar_url: user.profile_image_url,
            access_token: None,
        }])
    }
}
