//! Handler tests for the social accounts domain.
//!
//! Run the full connect pipeline through the router with in-memory stores and a
//! stub platform adapter, so no database, Redis or platform API is needed.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use domain_social_accounts::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Adapter that accepts any code except "bad" and returns fixed candidates
struct StubAdapter {
    platform: Platform,
    config: PlatformConfig,
    http_client: reqwest::Client,
    candidates: Vec<AccountCandidate>,
}

#[async_trait]
impl PlatformAdapter for StubAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    fn scopes(&self) -> &'static [&'static str] {
        &["read"]
    }

    async fn exchange_code(
        &self,
        code: &str,
        _code_verifier: Option<&str>,
        _redirect_uri: &str,
    ) -> SocialAccountResult<PlatformToken> {
        if code == "bad" {
            return Err(SocialAccountError::upstream(self.platform, "Invalid verification code format."));
        }
        Ok(PlatformToken {
            access_token: "user-token".to_string(),
            refresh_token: None,
            expires_in: Some(5_184_000),
            scope: None,
        })
    }

    async fn fetch_accounts(&self, _token: &PlatformToken) -> SocialAccountResult<Vec<AccountCandidate>> {
        Ok(self.candidates.clone())
    }
}

fn acme_page() -> AccountCandidate {
    AccountCandidate {
        external_id: "123".to_string(),
        display_name: "Acme".to_string(),
        username: Some("acme".to_string()),
        profile_url: Some("https://www.facebook.com/acme".to_string()),
        avatar_url: None,
        access_token: Some("page-token".to_string()),
        platform_data: json!({ "page_id": "123" }),
    }
}

struct TestApp {
    router: Router,
    accounts: InMemorySocialAccountRepository,
    brands: InMemoryBrandRepository,
    store: InMemoryEphemeralStore,
    workspace_id: Uuid,
    user_id: Uuid,
    brand_id: Uuid,
}

async fn setup(name: &str, publisher: Option<FacebookPublisher>) -> TestApp {
    let builder = TestDataBuilder::from_test_name(name);
    let accounts = InMemorySocialAccountRepository::new();
    let brands = InMemoryBrandRepository::new();
    let store = InMemoryEphemeralStore::new();

    let mut brand = Brand::new(builder.workspace_id(), builder.name("brand", "acme"));
    brand.id = builder.brand_id();
    brands.insert(brand).await;

    let registry = PlatformRegistry::new().with(Arc::new(StubAdapter {
        platform: Platform::Facebook,
        config: PlatformConfig::new(Platform::Facebook, "app-id", "app-secret"),
        http_client: reqwest::Client::new(),
        candidates: vec![acme_page()],
    }));

    let mut service = SocialAccountService::new(
        accounts.clone(),
        brands.clone(),
        registry,
        Arc::new(store.clone()),
        CredentialCipher::from_hex(&CredentialCipher::generate_key()).unwrap(),
        OAuthSettings::new("https://api.test", "https://app.test"),
    );
    if let Some(publisher) = publisher {
        service = service.with_publisher(publisher);
    }

    TestApp {
        router: handlers::router(service),
        accounts,
        brands,
        store,
        workspace_id: builder.workspace_id(),
        user_id: builder.user_id(),
        brand_id: builder.brand_id(),
    }
}

// Helper to parse JSON response body
async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn query_param(url: &str, name: &str) -> String {
    let needle = format!("{}=", name);
    url.split(['?', '&'])
        .find_map(|pair| pair.strip_prefix(needle.as_str()))
        .unwrap()
        .to_string()
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    fn caller(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("x-workspace-id", self.workspace_id.to_string())
            .header("x-user-id", self.user_id.to_string())
    }

    async fn authorize(&self) -> String {
        let response = self
            .send(
                self.caller("GET", &format!("/oauth/facebook/authorize?brand_id={}", self.brand_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response.into_body()).await;
        assert_eq!(body["success"], true);
        body["data"]["url"].as_str().unwrap().to_string()
    }

    async fn callback(&self, query: &str) -> String {
        let response = self
            .send(
                Request::builder()
                    .uri(format!("/oauth/facebook/callback?{}", query))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::FOUND);
        response.headers()[header::LOCATION].to_str().unwrap().to_string()
    }

    /// authorize + callback; returns the selection session id
    async fn start_session(&self) -> String {
        let url = self.authorize().await;
        let state = query_param(&url, "state");
        let location = self.callback(&format!("code=good&state={}", state)).await;
        assert!(location.starts_with("https://app.test/social-accounts/select?"));
        assert_eq!(query_param(&location, "platform"), "facebook");
        query_param(&location, "session")
    }

    async fn connect(&self, session: &str, external_id: &str) -> axum::response::Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri("/oauth/connect")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "session": session, "external_id": external_id }).to_string(),
                ))
                .unwrap(),
        )
        .await
    }

    async fn readiness(&self) -> (i32, bool) {
        let brand = self.brands.get_by_id(self.brand_id).await.unwrap().unwrap();
        (brand.readiness_score, brand.ready_to_publish)
    }
}

#[tokio::test]
async fn test_authorize_returns_consent_url() {
    let app = setup("authorize_url", None).await;
    let url = app.authorize().await;

    assert!(url.starts_with("https://www.facebook.com/v19.0/dialog/oauth?"));
    assert!(url.contains("client_id=app-id"));
    assert!(url.contains(
        "redirect_uri=https%3A%2F%2Fapi.test%2Fapi%2Fsocial-accounts%2Foauth%2Ffacebook%2Fcallback"
    ));
    assert_eq!(query_param(&url, "state").len(), 64);
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_authorize_requires_caller_headers() {
    let app = setup("authorize_headers", None).await;
    let response = app
        .send(
            Request::builder()
                .uri(format!("/oauth/facebook/authorize?brand_id={}", app.brand_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_authorize_unknown_platform_and_brand() {
    let app = setup("authorize_unknown", None).await;

    let response = app
        .send(
            app.caller("GET", &format!("/oauth/myspace/authorize?brand_id={}", app.brand_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(
            app.caller("GET", &format!("/oauth/tiktok/authorize?brand_id={}", app.brand_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(
            app.caller("GET", &format!("/oauth/facebook/authorize?brand_id={}", Uuid::now_v7()))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_full_connect_flow() {
    let app = setup("full_flow", None).await;
    assert_eq!(app.readiness().await, (0, false));

    let session = app.start_session().await;

    // Pending candidates never expose tokens
    let response = app
        .send(
            Request::builder()
                .uri(format!("/oauth/accounts?session={}", session))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["data"]["platform"], "facebook");
    assert_eq!(body["data"]["accounts"][0]["external_id"], "123");
    assert!(!body.to_string().contains("page-token"));
    assert!(!body.to_string().contains("user-token"));

    let response = app.connect(&session, "123").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    let account = &body["data"];
    assert_eq!(account["display_name"], "Acme");
    assert_eq!(account["username"], "acme");
    assert_eq!(account["status"], "active");
    assert!(account.get("credentials_encrypted").is_none());
    assert!(!body.to_string().contains("page-token"));

    // Credentials are stored encrypted, with the page token
    let id: Uuid = account["id"].as_str().unwrap().parse().unwrap();
    let stored = app.accounts.get_by_id(id).await.unwrap().unwrap();
    assert!(!stored.credentials_encrypted.contains("page-token"));

    assert_eq!(app.readiness().await, (50, true));

    // The selection session is consumed
    let response = app.connect(&session, "123").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["error"]["code"], "SESSION_EXPIRED");
    assert_eq!(
        body["error"]["message"],
        "Session expired, please reconnect your account"
    );
}

#[tokio::test]
async fn test_connecting_active_account_conflicts() {
    let app = setup("conflict", None).await;

    let first = app.start_session().await;
    assert_eq!(app.connect(&first, "123").await.status(), StatusCode::OK);

    let second = app.start_session().await;
    let response = app.connect(&second, "123").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["error"]["code"], "CONFLICT");

    let accounts = app.accounts.list_by_brand(app.brand_id).await.unwrap();
    assert_eq!(accounts.len(), 1);
}

#[tokio::test]
async fn test_removed_account_reconnects_to_same_row() {
    let app = setup("reactivate", None).await;

    let session = app.start_session().await;
    let body = json_body(app.connect(&session, "123").await.into_body()).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .send(app.caller("DELETE", &format!("/{}", id)).body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["data"]["status"], "removed");
    assert_eq!(app.readiness().await, (25, false));

    // Removed accounts are hidden from the list
    let response = app
        .send(
            app.caller("GET", &format!("/?brand_id={}", app.brand_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    let body = json_body(response.into_body()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let session = app.start_session().await;
    let response = app.connect(&session, "123").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(app.readiness().await, (50, true));
}

#[tokio::test]
async fn test_disconnect_updates_readiness() {
    let app = setup("disconnect", None).await;

    let session = app.start_session().await;
    let body = json_body(app.connect(&session, "123").await.into_body()).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .send(
            app.caller("POST", &format!("/{}/disconnect", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["data"]["status"], "disconnected");
    assert_eq!(app.readiness().await, (25, false));

    // Other workspaces cannot see the account
    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri(format!("/{}/disconnect", id))
                .header("x-workspace-id", Uuid::now_v7().to_string())
                .header("x-user-id", app.user_id.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_session_is_session_expired() {
    let app = setup("unknown_session", None).await;

    let response = app
        .send(
            Request::builder()
                .uri("/oauth/accounts?session=deadbeef")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["error"]["code"], "SESSION_EXPIRED");
}

#[tokio::test]
async fn test_connect_validates_body() {
    let app = setup("connect_validation", None).await;
    let response = app.connect("", "123").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_callback_access_denied_redirects_to_error_page() {
    let app = setup("access_denied", None).await;
    let location = app
        .callback("error=access_denied&error_description=Permissions+error")
        .await;

    assert!(location.starts_with("https://app.test/social-accounts/error?platform=facebook&message="));
    assert!(location.contains("Permissions%20error"));
}

#[tokio::test]
async fn test_callback_unknown_platform_redirects_to_error_page() {
    let app = setup("callback_unknown_platform", None).await;
    let response = app
        .send(
            Request::builder()
                .uri("/oauth/myspace/callback?code=c&state=s")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://app.test/social-accounts/error?platform=myspace&message="));
    assert!(location.contains("Unsupported%20platform"));
}

#[tokio::test]
async fn test_callback_state_cannot_be_reused() {
    let app = setup("state_reuse", None).await;
    let url = app.authorize().await;
    let state = query_param(&url, "state");

    let first = app.callback(&format!("code=good&state={}", state)).await;
    assert!(first.contains("/social-accounts/select?"));

    let second = app.callback(&format!("code=good&state={}", state)).await;
    assert!(second.contains("/social-accounts/error?"));
    assert!(second.contains("Session%20expired"));
}

#[tokio::test]
async fn test_callback_upstream_failure_passes_message_through() {
    let app = setup("upstream_failure", None).await;
    let url = app.authorize().await;
    let state = query_param(&url, "state");

    let location = app.callback(&format!("code=bad&state={}", state)).await;
    assert!(location.contains("/social-accounts/error?"));
    assert!(location.contains("Invalid%20verification%20code%20format."));
}

#[tokio::test]
async fn test_publish_carousel_uses_page_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/123/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "p1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/123/feed"))
        .and(wiremock::matchers::header("authorization", "Bearer page-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "123_456" })))
        .expect(1)
        .mount(&server)
        .await;

    let app = setup("publish", Some(FacebookPublisher::new(server.uri()))).await;
    let session = app.start_session().await;
    let body = json_body(app.connect(&session, "123").await.into_body()).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .send(
            app.caller("POST", &format!("/{}/publish", id))
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "message": "Launch day", "image_urls": ["https://cdn.test/1.jpg"] })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["data"]["post_id"], "123_456");
    assert_eq!(body["data"]["media_ids"], json!(["p1"]));
}

#[tokio::test]
async fn test_publish_rejects_empty_image_list() {
    let app = setup("publish_validation", None).await;
    let response = app
        .send(
            app.caller("POST", &format!("/{}/publish", Uuid::now_v7()))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "message": "Hi", "image_urls": [] }).to_string()))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
