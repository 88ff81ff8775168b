use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::brands::BrandRepository;
use crate::crypto::CredentialCipher;
use crate::ephemeral::EphemeralStore;
use crate::error::{SocialAccountError, SocialAccountResult};
use crate::models::{
    AccountStatus, AuthorizeResponse, Brand, CallbackQuery, CallerContext, ConnectAccount,
    Credentials, OAuthStateData, PendingSelection, Platform, PublishCarousel, PublishedPost,
    SelectionData, SocialAccount, UpsertSocialAccount,
};
use crate::oauth::{OAuthStateStore, SelectionCache};
use crate::platforms::PlatformRegistry;
use crate::publishing::FacebookPublisher;
use crate::readiness;
use crate::repository::SocialAccountRepository;

/// Where platforms send the user back to, and where the user lands afterwards
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    /// Public base URL of this API, e.g. `https://api.example.com`
    pub redirect_base_url: String,
    /// Base URL of the web app
    pub frontend_url: String,
}

impl OAuthSettings {
    pub fn new(redirect_base_url: impl Into<String>, frontend_url: impl Into<String>) -> Self {
        Self {
            redirect_base_url: redirect_base_url.into().trim_end_matches('/').to_string(),
            frontend_url: frontend_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Must match the redirect URI registered with the platform
    pub fn redirect_uri(&self, platform: Platform) -> String {
        format!(
            "{}/api/social-accounts/oauth/{}/callback",
            self.redirect_base_url, platform
        )
    }

    pub fn selection_url(&self, session: &str, platform: Platform) -> String {
        format!(
            "{}/social-accounts/select?session={}&platform={}",
            self.frontend_url,
            urlencoding::encode(session),
            platform
        )
    }

    /// `platform` is echoed as received, so unsupported path segments are accepted too
    pub fn error_url(&self, platform: impl std::fmt::Display, message: &str) -> String {
        format!(
            "{}/social-accounts/error?platform={}&message={}",
            self.frontend_url,
            urlencoding::encode(&platform.to_string()),
            urlencoding::encode(message)
        )
    }
}

/// Social account connect pipeline and account lifecycle
pub struct SocialAccountService<R: SocialAccountRepository, B: BrandRepository> {
    accounts: Arc<R>,
    brands: Arc<B>,
    registry: Arc<PlatformRegistry>,
    states: OAuthStateStore,
    selections: SelectionCache,
    cipher: Arc<CredentialCipher>,
    publisher: FacebookPublisher,
    settings: OAuthSettings,
}

impl<R: SocialAccountRepository, B: BrandRepository> SocialAccountService<R, B> {
    pub fn new(
        accounts: R,
        brands: B,
        registry: PlatformRegistry,
        store: Arc<dyn EphemeralStore>,
        cipher: CredentialCipher,
        settings: OAuthSettings,
    ) -> Self {
        Self {
            accounts: Arc::new(accounts),
            brands: Arc::new(brands),
            registry: Arc::new(registry),
            states: OAuthStateStore::new(store.clone()),
            selections: SelectionCache::new(store),
            cipher: Arc::new(cipher),
            publisher: FacebookPublisher::default(),
            settings,
        }
    }

    pub fn with_publisher(mut self, publisher: FacebookPublisher) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn settings(&self) -> &OAuthSettings {
        &self.settings
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.registry.platforms()
    }

    async fn brand_for(&self, ctx: &CallerContext, brand_id: Uuid) -> SocialAccountResult<Brand> {
        self.brands
            .get_by_id(brand_id)
            .await?
            .filter(|b| b.workspace_id == ctx.workspace_id)
            .ok_or(SocialAccountError::BrandNotFound(brand_id))
    }

    /// Removed accounts and accounts of other workspaces are reported as missing
    async fn account_for(&self, ctx: &CallerContext, id: Uuid) -> SocialAccountResult<SocialAccount> {
        self.accounts
            .get_by_id(id)
            .await?
            .filter(|a| a.workspace_id == ctx.workspace_id && a.status != AccountStatus::Removed)
            .ok_or_else(|| SocialAccountError::AccountNotFound(id.to_string()))
    }

    async fn refresh_readiness(&self, brand_id: Uuid) {
        if let Err(e) = readiness::recalculate(&*self.accounts, &*self.brands, brand_id).await {
            tracing::warn!(brand_id = %brand_id, error = %e, "Failed to recalculate brand readiness");
        }
    }

    /// Start the connect flow: persist a state token and build the consent URL
    pub async fn authorize(
        &self,
        ctx: CallerContext,
        platform: Platform,
        brand_id: Uuid,
    ) -> SocialAccountResult<AuthorizeResponse> {
        let adapter = self.registry.get(platform)?;
        self.brand_for(&ctx, brand_id).await?;

        let code_verifier = adapter
            .uses_pkce()
            .then(OAuthStateStore::generate_code_verifier);

        let state = self
            .states
            .put(&OAuthStateData {
                brand_id,
                workspace_id: ctx.workspace_id,
                user_id: ctx.user_id,
                platform,
                created_at: Utc::now(),
                code_verifier: code_verifier.clone(),
            })
            .await?;

        let url = adapter.authorize_url(
            &state,
            code_verifier.as_deref(),
            &self.settings.redirect_uri(platform),
        )?;

        tracing::info!(%platform, brand_id = %brand_id, "Started OAuth authorization");
        Ok(AuthorizeResponse { url })
    }

    /// Finish the platform round trip; returns the selection session id
    pub async fn handle_callback(
        &self,
        platform: Platform,
        query: CallbackQuery,
    ) -> SocialAccountResult<String> {
        if let Some(error) = query.error {
            return Err(SocialAccountError::OAuthDenied(
                query.error_description.unwrap_or(error),
            ));
        }

        let (code, state) = match (query.code, query.state) {
            (Some(code), Some(state)) if !code.is_empty() && !state.is_empty() => (code, state),
            _ => {
                return Err(SocialAccountError::Validation(
                    "Missing code or state".to_string(),
                ));
            }
        };

        let state = self.states.take(&state).await?;
        if state.platform != platform {
            return Err(SocialAccountError::PlatformMismatch {
                expected: state.platform,
                actual: platform,
            });
        }

        let adapter = self.registry.get(platform)?;
        let token = adapter
            .exchange_code(
                &code,
                state.code_verifier.as_deref(),
                &self.settings.redirect_uri(platform),
            )
            .await?;

        let candidates = adapter.fetch_accounts(&token).await?;
        if candidates.is_empty() {
            return Err(SocialAccountError::Validation(format!(
                "No eligible {} accounts were found",
                platform.label()
            )));
        }

        tracing::info!(
            %platform,
            brand_id = %state.brand_id,
            candidates = candidates.len(),
            "OAuth callback completed"
        );

        self.selections
            .put(&SelectionData {
                state,
                token,
                candidates,
                created_at: Utc::now(),
            })
            .await
    }

    /// Callback outcome as a frontend redirect location; failures go to the error page
    pub async fn callback_redirect(&self, platform: Platform, query: CallbackQuery) -> String {
        match self.handle_callback(platform, query).await {
            Ok(session) => self.settings.selection_url(&session, platform),
            Err(e) => {
                tracing::warn!(%platform, error = %e, "OAuth callback failed");
                self.settings.error_url(platform, &e.user_message())
            }
        }
    }

    /// Candidates waiting for selection, without tokens
    pub async fn pending_accounts(&self, session: &str) -> SocialAccountResult<PendingSelection> {
        let selection = self.selections.get(session).await?;
        Ok(PendingSelection::from(&selection))
    }

    /// Persist the chosen candidate as a social account.
    ///
    /// The selection is only discarded once the account is stored, so a
    /// failed attempt can be retried within the session's lifetime.
    pub async fn connect(&self, input: ConnectAccount) -> SocialAccountResult<SocialAccount> {
        input
            .validate()
            .map_err(|e| SocialAccountError::Validation(e.to_string()))?;

        let selection = self.selections.get(&input.session).await?;
        let candidate = selection
            .candidates
            .iter()
            .find(|c| c.external_id == input.external_id)
            .cloned()
            .ok_or_else(|| SocialAccountError::AccountNotFound(input.external_id.clone()))?;

        let credentials = Credentials::for_candidate(&selection.token, &candidate, Utc::now());
        let encrypted = self.cipher.encrypt_credentials(&credentials)?;

        let account = self
            .accounts
            .upsert_from_selection(UpsertSocialAccount::from_candidate(
                &selection.state,
                candidate,
                encrypted,
            ))
            .await?;

        self.refresh_readiness(account.brand_id).await;
        // The account is stored; a stale selection only lingers until its TTL
        if let Err(e) = self.selections.delete(&input.session).await {
            tracing::warn!(account_id = %account.id, error = %e, "Failed to discard account selection");
        }

        tracing::info!(
            account_id = %account.id,
            platform = %account.platform,
            brand_id = %account.brand_id,
            "Connected social account"
        );
        Ok(account)
    }

    pub async fn list_accounts(
        &self,
        ctx: CallerContext,
        brand_id: Uuid,
    ) -> SocialAccountResult<Vec<SocialAccount>> {
        self.brand_for(&ctx, brand_id).await?;
        self.accounts.list_by_brand(brand_id).await
    }

    pub async fn disconnect(&self, ctx: CallerContext, id: Uuid) -> SocialAccountResult<SocialAccount> {
        self.change_status(ctx, id, AccountStatus::Disconnected).await
    }

    /// Soft delete; the row is kept so a reconnect reuses it
    pub async fn remove(&self, ctx: CallerContext, id: Uuid) -> SocialAccountResult<SocialAccount> {
        self.change_status(ctx, id, AccountStatus::Removed).await
    }

    async fn change_status(
        &self,
        ctx: CallerContext,
        id: Uuid,
        status: AccountStatus,
    ) -> SocialAccountResult<SocialAccount> {
        let account = self.account_for(&ctx, id).await?;
        let updated = self.accounts.set_status(account.id, status).await?;
        self.refresh_readiness(updated.brand_id).await;

        tracing::info!(account_id = %id, %status, "Changed social account status");
        Ok(updated)
    }

    /// Publish a multi-photo post to a connected Facebook page
    pub async fn publish_carousel(
        &self,
        ctx: CallerContext,
        id: Uuid,
        input: PublishCarousel,
    ) -> SocialAccountResult<PublishedPost> {
        input
            .validate()
            .map_err(|e| SocialAccountError::Validation(e.to_string()))?;

        let account = self.account_for(&ctx, id).await?;
        if account.platform != Platform::Facebook {
            return Err(SocialAccountError::Validation(format!(
                "Carousel publishing is not supported for {}",
                account.platform.label()
            )));
        }
        if account.status != AccountStatus::Active {
            return Err(SocialAccountError::Validation(
                "Account is not connected".to_string(),
            ));
        }

        let credentials = self.cipher.decrypt_credentials(&account.credentials_encrypted)?;
        let page_id = account
            .platform_data
            .get("page_id")
            .and_then(|v| v.as_str())
            .unwrap_or(&account.external_id);

        self.publisher
            .publish_carousel(
                page_id,
                &credentials.access_token,
                &input.message,
                &input.image_urls,
            )
            .await
    }
}
