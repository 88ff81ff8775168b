use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Social API",
        version = "0.1.0",
        description = "Connect brands to social platforms and manage the connected accounts"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/social-accounts", api = domain_social_accounts::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
