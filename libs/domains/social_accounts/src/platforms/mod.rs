//! OAuth adapters for the supported social platforms.
//!
//! Every adapter implements [`PlatformAdapter`]. The default `authorize_url` and
//! `exchange_code` run the standard authorization-code flow through the
//! `oauth2` crate; platforms that deviate from it (TikTok's `client_key`,
//! LinkedIn's token response without `token_type`) override them.

pub mod facebook;
pub mod instagram;
pub mod linkedin;
pub mod pinterest;
mod registry;
pub mod tiktok;
pub mod x;
pub mod youtube;

pub use registry::PlatformRegistry;

use async_trait::async_trait;
use oauth2::basic::{BasicClient, BasicErrorResponse};
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, HttpClientError,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, RequestTokenError, Scope,
    TokenResponse as _, TokenUrl,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{SocialAccountError, SocialAccountResult};
use crate::models::{AccountCandidate, Platform, PlatformToken};

/// Base URLs an adapter talks to; overridable so tests can point at a mock server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    /// Root of the platform's REST API, without a trailing slash
    pub api_base: String,
}

impl PlatformEndpoints {
    pub fn new(
        authorize_url: impl Into<String>,
        token_url: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            authorize_url: authorize_url.into(),
            token_url: token_url.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Production endpoints of `platform`
    pub fn defaults(platform: Platform) -> Self {
        match platform {
            Platform::Facebook => facebook::default_endpoints(),
            Platform::Instagram => instagram::default_endpoints(),
            Platform::Tiktok => tiktok::default_endpoints(),
            Platform::Linkedin => linkedin::default_endpoints(),
            Platform::X => x::default_endpoints(),
            Platform::Pinterest => pinterest::default_endpoints(),
            Platform::Youtube => youtube::default_endpoints(),
        }
    }
}

/// App credentials registered with a platform
#[derive(Clone)]
pub struct PlatformConfig {
    pub client_id: String,
    pub client_secret: String,
    pub endpoints: PlatformEndpoints,
}

impl PlatformConfig {
    pub fn new(
        platform: Platform,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            endpoints: PlatformEndpoints::defaults(platform),
        }
    }

    pub fn with_endpoints(mut self, endpoints: PlatformEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    fn config(&self) -> &PlatformConfig;

    fn http_client(&self) -> &reqwest::Client;

    fn scopes(&self) -> &'static [&'static str];

    /// Platforms requiring PKCE get a code verifier stored with the state
    fn uses_pkce(&self) -> bool {
        false
    }

    /// How the token endpoint expects the client credentials
    fn client_auth(&self) -> AuthType {
        AuthType::RequestBody
    }

    /// Extra query parameters for the authorization URL
    fn extra_authorize_params(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// Consent page URL the user is redirected to
    fn authorize_url(
        &self,
        state: &str,
        code_verifier: Option<&str>,
        redirect_uri: &str,
    ) -> SocialAccountResult<String> {
        let config = self.config();
        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_uri(auth_url(&config.endpoints)?)
            .set_redirect_uri(redirect_url(redirect_uri)?);

        let mut request = self
            .scopes()
            .iter()
            .fold(
                client.authorize_url(|| CsrfToken::new(state.to_string())),
                |acc, scope| acc.add_scope(Scope::new(scope.to_string())),
            );

        for (name, value) in self.extra_authorize_params() {
            request = request.add_extra_param(*name, *value);
        }

        if let Some(verifier) = code_verifier {
            let verifier = PkceCodeVerifier::new(verifier.to_string());
            request = request.set_pkce_challenge(PkceCodeChallenge::from_code_verifier_sha256(&verifier));
        }

        let (url, _) = request.url();
        Ok(url.to_string())
    }

    /// Trade the authorization code for a token
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
        redirect_uri: &str,
    ) -> SocialAccountResult<PlatformToken> {
        let config = self.config();
        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_type(self.client_auth())
            .set_auth_uri(auth_url(&config.endpoints)?)
            .set_token_uri(token_url(&config.endpoints)?)
            .set_redirect_uri(redirect_url(redirect_uri)?);

        let mut request = client.exchange_code(AuthorizationCode::new(code.to_string()));
        if let Some(verifier) = code_verifier {
            request = request.set_pkce_verifier(PkceCodeVerifier::new(verifier.to_string()));
        }

        let token = request
            .request_async(self.http_client())
            .await
            .map_err(|e| token_error(self.platform(), e))?;

        Ok(PlatformToken {
            access_token: token.access_token().secret().clone(),
            refresh_token: token.refresh_token().map(|t| t.secret().clone()),
            expires_in: token.expires_in().map(|d| d.as_secs()),
            scope: token.scopes().map(|scopes| {
                scopes
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            }),
        })
    }

    /// Accounts the token gives access to: the profile itself, pages or channels
    async fn fetch_accounts(&self, token: &PlatformToken) -> SocialAccountResult<Vec<AccountCandidate>>;
}

/// HTTP client shared by the adapters
pub fn default_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_default()
}

fn auth_url(endpoints: &PlatformEndpoints) -> SocialAccountResult<AuthUrl> {
    AuthUrl::new(endpoints.authorize_url.clone())
        .map_err(|e| SocialAccountError::Internal(format!("Invalid auth URL: {}", e)))
}

fn token_url(endpoints: &PlatformEndpoints) -> SocialAccountResult<TokenUrl> {
    TokenUrl::new(endpoints.token_url.clone())
        .map_err(|e| SocialAccountError::Internal(format!("Invalid token URL: {}", e)))
}

fn redirect_url(redirect_uri: &str) -> SocialAccountResult<RedirectUrl> {
    RedirectUrl::new(redirect_uri.to_string())
        .map_err(|e| SocialAccountError::Internal(format!("Invalid redirect URL: {}", e)))
}

fn token_error(
    platform: Platform,
    err: RequestTokenError<HttpClientError<reqwest::Error>, BasicErrorResponse>,
) -> SocialAccountError {
    let message = match err {
        RequestTokenError::ServerResponse(response) => response
            .error_description()
            .cloned()
            .unwrap_or_else(|| response.error().to_string()),
        RequestTokenError::Request(e) => format!("Failed to exchange code: {}", e),
        RequestTokenError::Parse(_, body) => error_message(&String::from_utf8_lossy(&body))
            .unwrap_or_else(|| "Unexpected token response".to_string()),
        RequestTokenError::Other(msg) => msg,
    };

    tracing::warn!(%platform, error = %message, "Token exchange failed");
    SocialAccountError::upstream(platform, message)
}

/// Best effort extraction of the human readable message from an error body
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let text = |v: &serde_json::Value| v.as_str().filter(|s| !s.is_empty()).map(str::to_string);

    value
        .pointer("/error/message")
        .and_then(text)
        .or_else(|| value.get("error_description").and_then(text))
        .or_else(|| value.get("message").and_then(text))
        .or_else(|| value.get("detail").and_then(text))
        .or_else(|| value.get("error").and_then(text))
}

/// Send `request` and decode a 2xx JSON body; anything else is `Upstream`
pub(crate) async fn send_json<T: DeserializeOwned>(
    platform: Platform,
    request: reqwest::RequestBuilder,
) -> SocialAccountResult<T> {
    let response = request.send().await.map_err(|e| {
        SocialAccountError::upstream(platform, format!("Failed to reach {}: {}", platform.label(), e))
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body)
            .unwrap_or_else(|| format!("{} API returned {}", platform.label(), status));
        tracing::warn!(%platform, %status, error = %message, "Platform API request failed");
        return Err(SocialAccountError::upstream(platform, message));
    }

    response.json::<T>().await.map_err(|e| {
        SocialAccountError::upstream(
            platform,
            format!("Failed to parse {} response: {}", platform.label(), e),
        )
    })
}

#[derive(Debug, Deserialize)]
struct RawTokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
    scope: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Form-encoded token exchange for platforms that don't fit `oauth2`'s response shape
pub(crate) async fn post_token_form(
    platform: Platform,
    client: &reqwest::Client,
    token_url: &str,
    form: &[(&str, &str)],
) -> SocialAccountResult<PlatformToken> {
    let raw: RawTokenResponse = send_json(platform, client.post(token_url).form(form)).await?;

    match raw.access_token {
        Some(access_token) if !access_token.is_empty() => Ok(PlatformToken {
            access_token,
            refresh_token: raw.refresh_token,
            expires_in: raw.expires_in,
            scope: raw.scope,
        }),
        _ => {
            let message = raw
                .error_description
                .or(raw.error)
                .unwrap_or_else(|| "Token response did not include an access token".to_string());
            Err(SocialAccountError::upstream(platform, message))
        }
    }
}
