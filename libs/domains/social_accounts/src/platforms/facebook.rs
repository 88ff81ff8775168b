use async_trait::async_trait;
use serde::Deserialize;

use super::{PlatformAdapter, PlatformConfig, PlatformEndpoints, default_http_client, send_json};
use crate::error::SocialAccountResult;
use crate::models::{AccountCandidate, Platform, PlatformToken};

pub const GRAPH_VERSION: &str = "v19.0";

pub fn default_endpoints() -> PlatformEndpoints {
    PlatformEndpoints::new(
        format!("https://www.facebook.com/{}/dialog/oauth", GRAPH_VERSION),
        format!("https://graph.facebook.com/{}/oauth/access_token", GRAPH_VERSION),
        format!("https://graph.facebook.com/{}", GRAPH_VERSION),
    )
}

/// Facebook Pages: one candidate per page the user manages, carrying the page token
pub struct FacebookAdapter {
    config: PlatformConfig,
    http_client: reqwest::Client,
}

impl FacebookAdapter {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            http_client: default_http_client(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphList<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Page {
    id: String,
    name: String,
    username: Option<String>,
    access_token: Option<String>,
    link: Option<String>,
    picture: Option<Picture>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Picture {
    pub data: Option<PictureData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PictureData {
    pub url: Option<String>,
}

impl Picture {
    pub(crate) fn into_url(self) -> Option<String> {
        self.data.and_then(|d| d.url)
    }
}

impl From<Page> for AccountCandidate {
    fn from(page: Page) -> Self {
        let profile_url = page
            .link
            .unwrap_or_else(|| format!("https://www.facebook.com/{}", page.id));

        AccountCandidate {
            platform_data: serde_json::json!({ "page_id": page.id }),
            external_id: page.id,
            display_name: page.name,
            username: page.username,
            profile_url: Some(profile_url),
            avatar_url: page.picture.and_then(Picture::into_url),
            access_token: page.access_token,
        }
    }
}

#[async_trait]
impl PlatformAdapter for FacebookAdapter {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    fn scopes(&self) -> &'static [&'static str] {
        &[
            "pages_show_list",
            "pages_read_engagement",
            "pages_manage_posts",
            "public_profile",
        ]
    }

    async fn fetch_accounts(&self, token: &PlatformToken) -> SocialAccountResult<Vec<AccountCandidate>> {
        let url = format!("{}/me/accounts", self.config.endpoints.api_base);
        let pages: GraphList<Page> = send_json(
            Platform::Facebook,
            self.http_client
                .get(url)
                .query(&[("fields", "id,name,username,access_token,picture,link")])
                .bearer_auth(&token.access_token),
        )
        .await?;

        tracing::debug!(pages = pages.data.len(), "Fetched Facebook pages");
        Ok(pages.data.into_iter().map(AccountCandidate::from).collect())
    }
}
