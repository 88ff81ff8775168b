use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{ApiResponse, ErrorResponse, ValidatedJson, ValidatedQuery};
use std::str::FromStr;
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::brands::BrandRepository;
use crate::error::{SocialAccountError, SocialAccountResult};
use crate::models::{
    AccountStatus, AuthorizeQuery, AuthorizeResponse, CallbackQuery, CallerContext,
    CandidateView, ConnectAccount, ListAccountsQuery, PendingSelection, Platform,
    PublishCarousel, PublishedPost, SessionQuery, SocialAccount,
};
use crate::repository::SocialAccountRepository;
use crate::service::SocialAccountService;

const TAG: &str = "social-accounts";

#[derive(OpenApi)]
#[openapi(
    paths(
        authorize,
        callback,
        pending_accounts,
        connect,
        list_accounts,
        disconnect_account,
        remove_account,
        publish_carousel,
    ),
    components(schemas(
        Platform,
        AccountStatus,
        AuthorizeResponse,
        CandidateView,
        PendingSelection,
        ConnectAccount,
        SocialAccount,
        PublishCarousel,
        PublishedPost,
        ErrorResponse,
    )),
    tags((name = TAG, description = "Social account connections"))
)]
pub struct ApiDoc;

type SharedService<R, B> = Arc<SocialAccountService<R, B>>;

/// Routes relative to `/social-accounts`
pub fn router<R, B>(service: SocialAccountService<R, B>) -> Router
where
    R: SocialAccountRepository + 'static,
    B: BrandRepository + 'static,
{
    Router::new()
        .route("/oauth/{platform}/authorize", get(authorize::<R, B>))
        .route("/oauth/{platform}/callback", get(callback::<R, B>))
        .route("/oauth/accounts", get(pending_accounts::<R, B>))
        .route("/oauth/connect", post(connect::<R, B>))
        .route("/", get(list_accounts::<R, B>))
        .route("/{id}", axum::routing::delete(remove_account::<R, B>))
        .route("/{id}/disconnect", post(disconnect_account::<R, B>))
        .route("/{id}/publish", post(publish_carousel::<R, B>))
        .with_state(Arc::new(service))
}

fn parse_platform(raw: &str) -> SocialAccountResult<Platform> {
    Platform::from_str(raw)
        .map_err(|_| SocialAccountError::Validation(format!("Unsupported platform: {}", raw)))
}

/// Build the platform consent URL for a brand
#[utoipa::path(
    get,
    path = "/oauth/{platform}/authorize",
    tag = TAG,
    params(
        ("platform" = Platform, Path, description = "Platform to connect"),
        ("x-workspace-id" = Uuid, Header, description = "Workspace of the caller"),
        ("x-user-id" = Uuid, Header, description = "Calling user"),
        AuthorizeQuery
    ),
    responses(
        (status = 200, description = "Consent URL", body = ApiResponse<AuthorizeResponse>),
        (status = 400, description = "Unsupported or unconfigured platform", body = ErrorResponse),
        (status = 404, description = "Brand not found", body = ErrorResponse)
    )
)]
async fn authorize<R: SocialAccountRepository, B: BrandRepository>(
    State(service): State<SharedService<R, B>>,
    ctx: CallerContext,
    Path(platform): Path<String>,
    ValidatedQuery(query): ValidatedQuery<AuthorizeQuery>,
) -> SocialAccountResult<ApiResponse<AuthorizeResponse>> {
    let platform = parse_platform(&platform)?;
    let response = service.authorize(ctx, platform, query.brand_id).await?;
    Ok(ApiResponse::ok(response))
}

/// Redirect target registered with the platform
#[utoipa::path(
    get,
    path = "/oauth/{platform}/callback",
    tag = TAG,
    params(
        ("platform" = Platform, Path, description = "Platform that issued the code"),
        CallbackQuery
    ),
    responses(
        (status = 302, description = "Redirect to the account selection page or the error page")
    )
)]
async fn callback<R: SocialAccountRepository, B: BrandRepository>(
    State(service): State<SharedService<R, B>>,
    Path(platform): Path<String>,
    Query(query): Query<CallbackQuery>,
) -> impl IntoResponse {
    let location = match parse_platform(&platform) {
        Ok(parsed) => service.callback_redirect(parsed, query).await,
        Err(e) => {
            tracing::warn!(%platform, error = %e, "OAuth callback for unsupported platform");
            service.settings().error_url(&platform, &e.user_message())
        }
    };
    (StatusCode::FOUND, [(header::LOCATION, location)])
}

/// Candidates of a selection session
#[utoipa::path(
    get,
    path = "/oauth/accounts",
    tag = TAG,
    params(SessionQuery),
    responses(
        (status = 200, description = "Accounts available for connection", body = ApiResponse<PendingSelection>),
        (status = 400, description = "Session expired", body = ErrorResponse)
    )
)]
async fn pending_accounts<R: SocialAccountRepository, B: BrandRepository>(
    State(service): State<SharedService<R, B>>,
    ValidatedQuery(query): ValidatedQuery<SessionQuery>,
) -> SocialAccountResult<ApiResponse<PendingSelection>> {
    let pending = service.pending_accounts(&query.session).await?;
    Ok(ApiResponse::ok(pending))
}

/// Finalize the connection of the selected account
#[utoipa::path(
    post,
    path = "/oauth/connect",
    tag = TAG,
    request_body = ConnectAccount,
    responses(
        (status = 200, description = "Connected account", body = ApiResponse<SocialAccount>),
        (status = 400, description = "Validation error or session expired", body = ErrorResponse),
        (status = 404, description = "Account not part of the session", body = ErrorResponse),
        (status = 409, description = "Account already connected", body = ErrorResponse)
    )
)]
async fn connect<R: SocialAccountRepository, B: BrandRepository>(
    State(service): State<SharedService<R, B>>,
    ValidatedJson(input): ValidatedJson<ConnectAccount>,
) -> SocialAccountResult<ApiResponse<SocialAccount>> {
    let account = service.connect(input).await?;
    Ok(ApiResponse::ok(account))
}

/// Accounts connected to a brand
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(
        ("x-workspace-id" = Uuid, Header, description = "Workspace of the caller"),
        ("x-user-id" = Uuid, Header, description = "Calling user"),
        ListAccountsQuery
    ),
    responses(
        (status = 200, description = "Accounts of the brand", body = ApiResponse<Vec<SocialAccount>>),
        (status = 404, description = "Brand not found", body = ErrorResponse)
    )
)]
async fn list_accounts<R: SocialAccountRepository, B: BrandRepository>(
    State(service): State<SharedService<R, B>>,
    ctx: CallerContext,
    ValidatedQuery(query): ValidatedQuery<ListAccountsQuery>,
) -> SocialAccountResult<ApiResponse<Vec<SocialAccount>>> {
    let accounts = service.list_accounts(ctx, query.brand_id).await?;
    Ok(ApiResponse::ok(accounts))
}

/// Keep the account but stop using it
#[utoipa::path(
    post,
    path = "/{id}/disconnect",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Social account ID"),
        ("x-workspace-id" = Uuid, Header, description = "Workspace of the caller"),
        ("x-user-id" = Uuid, Header, description = "Calling user")
    ),
    responses(
        (status = 200, description = "Disconnected account", body = ApiResponse<SocialAccount>),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
async fn disconnect_account<R: SocialAccountRepository, B: BrandRepository>(
    State(service): State<SharedService<R, B>>,
    ctx: CallerContext,
    Path(id): Path<Uuid>,
) -> SocialAccountResult<ApiResponse<SocialAccount>> {
    let account = service.disconnect(ctx, id).await?;
    Ok(ApiResponse::ok(account))
}

/// Soft delete an account
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Social account ID"),
        ("x-workspace-id" = Uuid, Header, description = "Workspace of the caller"),
        ("x-user-id" = Uuid, Header, description = "Calling user")
    ),
    responses(
        (status = 200, description = "Removed account", body = ApiResponse<SocialAccount>),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
async fn remove_account<R: SocialAccountRepository, B: BrandRepository>(
    State(service): State<SharedService<R, B>>,
    ctx: CallerContext,
    Path(id): Path<Uuid>,
) -> SocialAccountResult<ApiResponse<SocialAccount>> {
    let account = service.remove(ctx, id).await?;
    Ok(ApiResponse::ok(account))
}

/// Publish a multi-photo post to a Facebook page
#[utoipa::path(
    post,
    path = "/{id}/publish",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Social account ID"),
        ("x-workspace-id" = Uuid, Header, description = "Workspace of the caller"),
        ("x-user-id" = Uuid, Header, description = "Calling user")
    ),
    request_body = PublishCarousel,
    responses(
        (status = 200, description = "Published post", body = ApiResponse<PublishedPost>),
        (status = 400, description = "Invalid input or unsupported platform", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Facebook rejected the post", body = ErrorResponse)
    )
)]
async fn publish_carousel<R: SocialAccountRepository, B: BrandRepository>(
    State(service): State<SharedService<R, B>>,
    ctx: CallerContext,
    Path(id): Path<Uuid>,
    ValidatedJson(input): ValidatedJson<PublishCarousel>,
) -> SocialAccountResult<ApiResponse<PublishedPost>> {
    let post = service.publish_carousel(ctx, id, input).await?;
    Ok(ApiResponse::ok(post))
}
