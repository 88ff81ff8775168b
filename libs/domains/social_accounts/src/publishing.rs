//! Facebook multi-photo ("carousel") posts.
//!
//! Photos are uploaded unpublished first, then attached to a single feed post.
//! Steps run sequentially and the first failure aborts the post.

use serde::Deserialize;
use serde_json::json;

use crate::error::SocialAccountResult;
use crate::models::{Platform, PublishedPost};
use crate::platforms::{self, PlatformEndpoints, send_json};

#[derive(Debug, Deserialize)]
struct GraphId {
    id: String,
}

#[derive(Clone)]
pub struct FacebookPublisher {
    http_client: reqwest::Client,
    api_base: String,
}

impl Default for FacebookPublisher {
    fn default() -> Self {
        Self::new(PlatformEndpoints::defaults(Platform::Facebook).api_base)
    }
}

impl FacebookPublisher {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http_client: platforms::default_http_client(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn publish_carousel(
        &self,
        page_id: &str,
        page_token: &str,
        message: &str,
        image_urls: &[String],
    ) -> SocialAccountResult<PublishedPost> {
        let mut media_ids = Vec::with_capacity(image_urls.len());
        for url in image_urls {
            let photo: GraphId = send_json(
                Platform::Facebook,
                self.http_client
                    .post(format!("{}/{}/photos", self.api_base, page_id))
                    .bearer_auth(page_token)
                    .form(&[("url", url.as_str()), ("published", "false")]),
            )
            .await?;
            media_ids.push(photo.id);
        }

        let attached_media: Vec<_> = media_ids
            .iter()
            .map(|id| json!({ "media_fbid": id }))
            .collect();

        let post: GraphId = send_json(
            Platform::Facebook,
            self.http_client
                .post(format!("{}/{}/feed", self.api_base, page_id))
                .bearer_auth(page_token)
                .json(&json!({ "message": message, "attached_media": attached_media })),
        )
        .await?;

        tracing::info!(page_id, post_id = %post.id, photos = media_ids.len(), "Published Facebook carousel");
        Ok(PublishedPost {
            post_id: post.id,
            media_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SocialAccountError;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_publish_uploads_photos_then_posts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/42/photos"))
            .and(header("authorization", "Bearer page-token"))
            .and(body_string_contains("published=false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "photo-1"})))
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/42/feed"))
            .and(body_string_contains("media_fbid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "42_999"})))
            .expect(1)
            .mount(&server)
            .await;

        let publisher = FacebookPublisher::new(server.uri());
        let post = publisher
            .publish_carousel(
                "42",
                "page-token",
                "Hello",
                &["https://cdn.test/a.jpg".to_string(), "https://cdn.test/b.jpg".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(post.post_id, "42_999");
        assert_eq!(post.media_ids, vec!["photo-1", "photo-1"]);
    }

    #[tokio::test]
    async fn test_first_failure_aborts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/42/photos"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"message": "Invalid image URL", "code": 100}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/42/feed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x"})))
            .expect(0)
            .mount(&server)
            .await;

        let publisher = FacebookPublisher::new(server.uri());
        let err = publisher
            .publish_carousel("42", "t", "Hi", &["a".to_string(), "b".to_string()])
            .await
            .unwrap_err();

        match err {
            SocialAccountError::Upstream { message, .. } => assert_eq!(message, "Invalid image URL"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
