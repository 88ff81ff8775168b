use async_trait::async_trait;
use oauth2::url::Url;
use serde::Deserialize;

use super::{
    PlatformAdapter, PlatformConfig, PlatformEndpoints, default_http_client, post_token_form,
    send_json,
};
use crate::error::{SocialAccountError, SocialAccountResult};
use crate::models::{AccountCandidate, Platform, PlatformToken};

pub fn default_endpoints() -> PlatformEndpoints {
    PlatformEndpoints::new(
        "https://www.tiktok.com/v2/auth/authorize/",
        "https://open.tiktokapis.com/v2/oauth/token/",
        "https://open.tiktokapis.com",
    )
}

/// TikTok names the client id `client_key` and joins scopes with commas
pub struct TiktokAdapter {
    config: PlatformConfig,
    http_client: reqwest::Client,
}

impl TiktokAdapter {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            http_client: default_http_client(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    data: Option<UserInfoData>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct UserInfoData {
    user: Option<TiktokUser>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct TiktokUser {
    open_id: String,
    display_name: Option<String>,
    username: Option<String>,
    avatar_url: Option<String>,
    profile_deep_link: Option<String>,
}

#[async_trait]
impl PlatformAdapter for TiktokAdapter {
    fn platform(&self) -> Platform {
        Platform::Tiktok
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    fn scopes(&self) -> &'static [&'static str] {
        &["user.info.basic", "video.publish"]
    }

    fn authorize_url(
        &self,
        state: &str,
        _code_verifier: Option<&str>,
        redirect_uri: &str,
    ) -> SocialAccountResult<String> {
        let scope = self.scopes().join(",");
        let url = Url::parse_with_params(
            &self.config.endpoints.authorize_url,
            &[
                ("client_key", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("redirect_uri", redirect_uri),
                ("state", state),
            ],
        )
        .map_err(|e| SocialAccountError::Internal(format!("Invalid auth URL: {}", e)))?;

        Ok(url.to_string())
    }

    async fn exchange_code(
        &self,
        code: &str,
        _code_verifier: Option<&str>,
        redirect_uri: &str,
    ) -> SocialAccountResult<PlatformToken> {
        post_token_form(
            Platform::Tiktok,
            &self.http_client,
            &self.config.endpoints.token_url,
            &[
                ("client_key", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ],
        )
        .await
    }

    async fn fetch_accounts(&self, token: &PlatformToken) -> SocialAccountResult<Vec<AccountCandidate>> {
        let url = format!("{}/v2/user/info/", self.config.endpoints.api_base);
        let response: UserInfoResponse = send_json(
            Platform::Tiktok,
            self.http_client
                .get(url)
                .query(&[(
                    "fields",
                    "open_id,avatar_url,display_name,username,profile_deep_link",
                )])
                .bearer_auth(&token.access_token),
        )
        .await?;

        // TikTok reports errors inside a 200 body; "ok" means success
        if let Some(error) = response.error.filter(|e| e.code != "ok") {
            let message = if error.message.is_empty() { error.code } else { error.message };
            return Err(SocialAccountError::upstream(Platform::Tiktok, message));
        }

        let user = response
            .data
            .and_then(|d| d.user)
            .ok_or_else(|| SocialAccountError::upstream(Platform::Tiktok, "Missing user info"))?;

        let display_name = user
            .display_name
            .clone()
            .or_else(|| user.username.clone())
            .unwrap_or_else(|| user.open_id.clone());

        Ok(vec![AccountCandidate {
            profile_url: user
                .profile_deep_link
                .or_else(|| user.username.as_ref().map(|u| format!("https://www.tiktok.com/@{}", u))),
            platform_data: serde_json::json!({ "open_id": user.open_id }),
            external_id: user.open_id,
            display_name,
            username: user.username,
            avatar_url: user.avatar_url,
            access_token: None,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_uses_client_key() {
        let adapter = TiktokAdapter::new(PlatformConfig::new(Platform::Tiktok, "ck_123", "secret"));
        let url = adapter
            .authorize_url("state-1", None, "https://app.test/callback")
            .unwrap();

        assert!(url.starts_with("https://www.tiktok.com/v2/auth/authorize/?"));
        assert!(url.contains("client_key=ck_123"));
        assert!(url.contains("scope=user.info.basic%2Cvideo.publish"));
        assert!(url.contains("state=state-1"));
        assert!(!url.contains("client_id"));
    }
}
