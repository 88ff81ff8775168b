use chrono::{DateTime, Duration, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Social platforms a brand can connect
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    #[sea_orm(string_value = "facebook")]
    Facebook,
    #[sea_orm(string_value = "instagram")]
    Instagram,
    #[sea_orm(string_value = "tiktok")]
    Tiktok,
    #[sea_orm(string_value = "linkedin")]
    Linkedin,
    #[sea_orm(string_value = "x")]
    X,
    #[sea_orm(string_value = "pinterest")]
    Pinterest,
    #[sea_orm(string_value = "youtube")]
    Youtube,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::Tiktok,
        Platform::Linkedin,
        Platform::X,
        Platform::Pinterest,
        Platform::Youtube,
    ];

    /// Human readable name
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::Tiktok => "TikTok",
            Platform::Linkedin => "LinkedIn",
            Platform::X => "X",
            Platform::Pinterest => "Pinterest",
            Platform::Youtube => "YouTube",
        }
    }
}

/// Lifecycle of a stored social account
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "disconnected")]
    Disconnected,
    #[sea_orm(string_value = "removed")]
    Removed,
}

/// Caller identity attached to an authorization request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerContext {
    pub workspace_id: Uuid,
    pub user_id: Uuid,
}

/// Record kept between `authorize` and `callback`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthStateData {
    pub brand_id: Uuid,
    pub workspace_id: Uuid,
    pub user_id: Uuid,
    pub platform: Platform,
    pub created_at: DateTime<Utc>,
    /// Present only for PKCE platforms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_verifier: Option<String>,
}

/// Token set returned by a platform's code exchange
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds until the access token expires
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl std::fmt::Debug for PlatformToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformToken")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// An account the user may pick after logging in: a profile, a page or a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountCandidate {
    pub external_id: String,
    pub display_name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Asset-scoped token (e.g. a Facebook page token) that replaces the user token
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub platform_data: serde_json::Value,
}

/// Candidate as shown to the client, without tokens
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CandidateView {
    pub external_id: String,
    pub display_name: String,
    pub username: Option<String>,
    pub profile_url: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<&AccountCandidate> for CandidateView {
    fn from(candidate: &AccountCandidate) -> Self {
        Self {
            external_id: candidate.external_id.clone(),
            display_name: candidate.display_name.clone(),
            username: candidate.username.clone(),
            profile_url: candidate.profile_url.clone(),
            avatar_url: candidate.avatar_url.clone(),
        }
    }
}

/// Record kept between a successful callback and the user's selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionData {
    pub state: OAuthStateData,
    pub token: PlatformToken,
    pub candidates: Vec<AccountCandidate>,
    pub created_at: DateTime<Utc>,
}

/// Response of `GET /oauth/accounts`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PendingSelection {
    pub platform: Platform,
    pub brand_id: Uuid,
    pub accounts: Vec<CandidateView>,
}

impl From<&SelectionData> for PendingSelection {
    fn from(selection: &SelectionData) -> Self {
        Self {
            platform: selection.state.platform,
            brand_id: selection.state.brand_id,
            accounts: selection.candidates.iter().map(CandidateView::from).collect(),
        }
    }
}

/// Plaintext of `credentials_encrypted`
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Credentials {
    /// Prefer the candidate's own token over the user token
    pub fn for_candidate(token: &PlatformToken, candidate: &AccountCandidate, now: DateTime<Utc>) -> Self {
        let (access_token, expires_at) = match &candidate.access_token {
            Some(asset_token) => (asset_token.clone(), None),
            None => (
                token.access_token.clone(),
                token
                    .expires_in
                    .and_then(|secs| i64::try_from(secs).ok())
                    .map(|secs| now + Duration::seconds(secs)),
            ),
        };

        Self {
            access_token,
            refresh_token: token.refresh_token.clone(),
            expires_at,
            scope: token.scope.clone(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// A connected social account
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SocialAccount {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub brand_id: Uuid,
    pub platform: Platform,
    pub external_id: String,
    pub display_name: String,
    pub username: Option<String>,
    pub profile_url: Option<String>,
    pub avatar_url: Option<String>,
    pub status: AccountStatus,
    /// `base64(nonce):base64(ciphertext)`; never serialized
    #[serde(skip)]
    pub credentials_encrypted: String,
    #[schema(value_type = Object)]
    pub platform_data: serde_json::Value,
    pub connected_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::repository::SocialAccountRepository::upsert_from_selection`]
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertSocialAccount {
    pub workspace_id: Uuid,
    pub brand_id: Uuid,
    pub platform: Platform,
    pub external_id: String,
    pub display_name: String,
    pub username: Option<String>,
    pub profile_url: Option<String>,
    pub avatar_url: Option<String>,
    pub credentials_encrypted: String,
    pub platform_data: serde_json::Value,
}

impl UpsertSocialAccount {
    pub fn from_candidate(
        state: &OAuthStateData,
        candidate: AccountCandidate,
        credentials_encrypted: String,
    ) -> Self {
        Self {
            workspace_id: state.workspace_id,
            brand_id: state.brand_id,
            platform: state.platform,
            external_id: candidate.external_id,
            display_name: candidate.display_name,
            username: candidate.username,
            profile_url: candidate.profile_url,
            avatar_url: candidate.avatar_url,
            credentials_encrypted,
            platform_data: candidate.platform_data,
        }
    }
}

impl SocialAccount {
    /// New ACTIVE account from an upsert input
    pub fn new(input: UpsertSocialAccount) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            workspace_id: input.workspace_id,
            brand_id: input.brand_id,
            platform: input.platform,
            external_id: input.external_id,
            display_name: input.display_name,
            username: input.username,
            profile_url: input.profile_url,
            avatar_url: input.avatar_url,
            status: AccountStatus::Active,
            credentials_encrypted: input.credentials_encrypted,
            platform_data: input.platform_data,
            connected_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bring a disconnected or removed account back with fresh data, keeping its id
    pub fn reactivate(&mut self, input: UpsertSocialAccount) {
        let now = Utc::now();
        self.brand_id = input.brand_id;
        self.display_name = input.display_name;
        self.username = input.username;
        self.profile_url = input.profile_url;
        self.avatar_url = input.avatar_url;
        self.credentials_encrypted = input.credentials_encrypted;
        self.platform_data = input.platform_data;
        self.status = AccountStatus::Active;
        self.connected_at = now;
        self.updated_at = now;
    }
}

/// Brand fields the readiness calculation reads and writes
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Brand {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    /// 0..=100
    pub readiness_score: i32,
    pub ready_to_publish: bool,
    pub updated_at: DateTime<Utc>,
}

impl Brand {
    pub fn new(workspace_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            workspace_id,
            name: name.into(),
            description: None,
            logo_url: None,
            website: None,
            readiness_score: 0,
            ready_to_publish: false,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorizeQuery {
    pub brand_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthorizeResponse {
    pub url: String,
}

/// Query string the platform appends to the redirect URI
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SessionQuery {
    #[validate(length(min = 1, max = 128))]
    pub session: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ConnectAccount {
    #[validate(length(min = 1, max = 128))]
    pub session: String,
    #[validate(length(min = 1, max = 255))]
    pub external_id: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAccountsQuery {
    pub brand_id: Uuid,
}

/// Facebook multi-photo post
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PublishCarousel {
    #[validate(length(max = 63206))]
    pub message: String,
    #[validate(length(min = 1, max = 10))]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PublishedPost {
    pub post_id: String,
    pub media_ids: Vec<String>,
}
