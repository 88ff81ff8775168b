use async_trait::async_trait;
use serde::Deserialize;

use super::{PlatformAdapter, PlatformConfig, PlatformEndpoints, default_http_client, send_json};
use crate::error::SocialAccountResult;
use crate::models::{AccountCandidate, Platform, PlatformToken};

pub fn default_endpoints() -> PlatformEndpoints {
    PlatformEndpoints::new(
        "https://accounts.google.com/o/oauth2/v2/auth",
        "https://oauth2.googleapis.com/token",
        "https://www.googleapis.com",
    )
}

/// YouTube channels owned by the Google account
pub struct YoutubeAdapter {
    config: PlatformConfig,
    http_client: reqwest::Client,
}

impl YoutubeAdapter {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            http_client: default_http_client(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChannelList {
    #[serde(default)]
    items: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    id: String,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: Option<String>,
    custom_url: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

impl From<Channel> for AccountCandidate {
    fn from(channel: Channel) -> Self {
        let snippet = channel.snippet.unwrap_or(Snippet {
            title: None,
            custom_url: None,
            thumbnails: None,
        });
        let profile_url = match &snippet.custom_url {
            Some(handle) => format!("https://www.youtube.com/{}", handle),
            None => format!("https://www.youtube.com/channel/{}", channel.id),
        };

        AccountCandidate {
            display_name: snippet.title.unwrap_or_else(|| channel.id.clone()),
            platform_data: serde_json::json!({ "channel_id": channel.id }),
            external_id: channel.id,
            username: snippet.custom_url,
            profile_url: Some(profile_url),
            avatar_url: snippet
                .thumbnails
                .and_then(|t| t.default)
                .and_then(|t| t.url),
            access_token: None,
        }
    }
}

#[async_trait]
impl PlatformAdapter for YoutubeAdapter {
    fn platform(&self) -> Platform {
        Platform::Youtube
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    fn scopes(&self) -> &'static [&'static str] {
        &[
            "https://www.googleapis.com/auth/youtube.readonly",
            "https://www.googleapis.com/auth/youtube.upload",
        ]
    }

    /// Offline access with forced consent so Google always returns a refresh token
    fn extra_authorize_params(&self) -> &'static [(&'static str, &'static str)] {
        &[("access_type", "offline"), ("prompt", "consent")]
    }

    async fn fetch_accounts(&self, token: &PlatformToken) -> SocialAccountResult<Vec<AccountCandidate>> {
        let url = format!("{}/youtube/v3/channels", self.config.endpoints.api_base);
        let channels: ChannelList = send_json(
            Platform::Youtube,
            self.http_client
                .get(url)
                .query(&[("part", "snippet"), ("mine", "true")])
                .bearer_auth(&token.access_token),
        )
        .await?;

        Ok(channels.items.into_iter().map(AccountCandidate::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_requests_offline_access() {
        let adapter = YoutubeAdapter::new(PlatformConfig::new(Platform::Youtube, "cid", "secret"));
        let url = adapter
            .authorize_url("s", None, "https://app.test/callback")
            .unwrap();

        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("client_id=cid"));
        assert!(!url.contains("code_challenge"));
    }
}
