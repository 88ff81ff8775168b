use axum::Router;
use domain_social_accounts::{
    CredentialCipher, OAuthSettings, PgBrandRepository, PgSocialAccountRepository,
    PlatformRegistry, RedisEphemeralStore, SocialAccountService, handlers,
};
use std::sync::Arc;

pub mod health;

/// API routes without the `/api` prefix; `create_router` adds it.
pub fn routes(state: &crate::state::AppState) -> eyre::Result<Router> {
    let oauth = &state.config.oauth;

    let cipher = CredentialCipher::from_hex(&oauth.encryption_key)
        .map_err(|e| eyre::eyre!("CREDENTIALS_ENCRYPTION_KEY is invalid: {}", e))?;
    let registry = PlatformRegistry::from_configs(oauth.platforms.clone());
    if registry.platforms().is_empty() {
        tracing::warn!("No social platform credentials configured");
    }

    let service = SocialAccountService::new(
        PgSocialAccountRepository::new(state.db.clone()),
        PgBrandRepository::new(state.db.clone()),
        registry,
        Arc::new(RedisEphemeralStore::new(state.redis.clone())),
        cipher,
        OAuthSettings::new(oauth.redirect_base_url.clone(), oauth.frontend_url.clone()),
    );

    Ok(Router::new().nest("/social-accounts", handlers::router(service)))
}

/// `/ready` with state applied, merged next to the stateless app router.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
