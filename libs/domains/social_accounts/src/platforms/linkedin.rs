use async_trait::async_trait;
use serde::Deserialize;

use super::{
    PlatformAdapter, PlatformConfig, PlatformEndpoints, default_http_client, post_token_form,
    send_json,
};
use crate::error::SocialAccountResult;
use crate::models::{AccountCandidate, Platform, PlatformToken};

pub fn default_endpoints() -> PlatformEndpoints {
    PlatformEndpoints::new(
        "https://www.linkedin.com/oauth/v2/authorization",
        "https://www.linkedin.com/oauth/v2/accessToken",
        "https://api.linkedin.com",
    )
}

/// LinkedIn member profile via OpenID Connect `userinfo`
pub struct LinkedinAdapter {
    config: PlatformConfig,
    http_client: reqwest::Client,
}

impl LinkedinAdapter {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            http_client: default_http_client(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    name: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    email: Option<String>,
    picture: Option<String>,
}

impl UserInfo {
    fn display_name(&self) -> String {
        if let Some(name) = self.name.as_ref().filter(|n| !n.is_empty()) {
            return name.clone();
        }
        let joined = [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() { self.sub.clone() } else { joined }
    }
}

#[async_trait]
impl PlatformAdapter for LinkedinAdapter {
    fn platform(&self) -> Platform {
        Platform::Linkedin
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    fn scopes(&self) -> &'static [&'static str] {
        &["openid", "profile", "email", "w_member_social"]
    }

    /// LinkedIn's token response carries no `token_type`
    async fn exchange_code(
        &self,
        code: &str,
        _code_verifier: Option<&str>,
        redirect_uri: &str,
    ) -> SocialAccountResult<PlatformToken> {
        post_token_form(
            Platform::Linkedin,
            &self.http_client,
            &self.config.endpoints.token_url,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ],
        )
        .await
    }

    async fn fetch_accounts(&self, token: &PlatformToken) -> SocialAccountResult<Vec<AccountCandidate>> {
        let url = format!("{}/v2/userinfo", self.config.endpoints.api_base);
        let info: UserInfo = send_json(
            Platform::Linkedin,
            self.http_client.get(url).bearer_auth(&token.access_token),
        )
        .await?;

        Ok(vec![AccountCandidate {
            display_name: info.display_name(),
            platform_data: serde_json::json!({
                "person_urn": format!("urn:li:person:{}", info.sub),
                "email": info.email,
            }),
            external_id: info.sub,
            username: None,
            profile_url: None,
            avatar_url: info.picture,
            access_token: None,
        }])
    }
}
