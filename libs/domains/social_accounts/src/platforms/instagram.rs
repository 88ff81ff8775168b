use async_trait::async_trait;
use serde::Deserialize;

use super::facebook::{self, GraphList};
use super::{PlatformAdapter, PlatformConfig, PlatformEndpoints, default_http_client, send_json};
use crate::error::SocialAccountResult;
use crate::models::{AccountCandidate, Platform, PlatformToken};

/// Instagram business accounts authorize through Facebook Login
pub fn default_endpoints() -> PlatformEndpoints {
    facebook::default_endpoints()
}

/// Candidates are the Instagram business accounts linked to the user's pages
pub struct InstagramAdapter {
    config: PlatformConfig,
    http_client: reqwest::Client,
}

impl InstagramAdapter {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            http_client: default_http_client(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageWithInstagram {
    id: String,
    access_token: Option<String>,
    instagram_business_account: Option<InstagramAccount>,
}

#[derive(Debug, Deserialize)]
struct InstagramAccount {
    id: String,
    username: Option<String>,
    name: Option<String>,
    profile_picture_url: Option<String>,
}

fn candidate(page: PageWithInstagram) -> Option<AccountCandidate> {
    let ig = page.instagram_business_account?;
    let display_name = ig
        .name
        .clone()
        .or_else(|| ig.username.clone())
        .unwrap_or_else(|| ig.id.clone());

    Some(AccountCandidate {
        profile_url: ig
            .username
            .as_ref()
            .map(|u| format!("https://www.instagram.com/{}", u)),
        platform_data: serde_json::json!({ "page_id": page.id, "instagram_account_id": ig.id }),
        external_id: ig.id,
        display_name,
        username: ig.username,
        avatar_url: ig.profile_picture_url,
        access_token: page.access_token,
    })
}

#[async_trait]
impl PlatformAdapter for InstagramAdapter {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    fn scopes(&self) -> &'static [&'static str] {
        &[
            "instagram_basic",
            "instagram_content_publish",
            "pages_show_list",
            "pages_read_engagement",
            "business_management",
        ]
    }

    async fn fetch_accounts(&self, token: &PlatformToken) -> SocialAccountResult<Vec<AccountCandidate>> {
        let url = format!("{}/me/accounts", self.config.endpoints.api_base);
        let pages: GraphList<PageWithInstagram> = send_json(
            Platform::Instagram,
            self.http_client
                .get(url)
                .query(&[(
                    "fields",
                    "id,access_token,instagram_business_account{id,username,name,profile_picture_url}",
                )])
                .bearer_auth(&token.access_token),
        )
        .await?;

        // Pages without a linked business account are not publishable on Instagram
        Ok(pages.data.into_iter().filter_map(candidate).collect())
    }
}
