//! # Axum Helpers
//!
//! Shared HTTP plumbing for the social account API.
//!
//! - **[`errors`]**: [`AppError`] and the `{success:false, error:{code,message}}` envelope
//! - **[`response`]**: [`ApiResponse`] for the `{success:true, data}` envelope
//! - **[`extractors`]**: validated JSON and query extractors
//! - **[`http`]**: security header middleware
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//!
//! ```ignore
//! let router = create_router::<ApiDoc>(api_routes).await?;
//! let app = router.merge(health_router(app_info!()));
//! create_production_app(app, &config.server, Duration::from_secs(30), cleanup).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod response;
pub mod server;

pub use errors::{AppError, ErrorBody, ErrorCode, ErrorResponse};
pub use extractors::{ValidatedJson, ValidatedQuery};
pub use response::ApiResponse;
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};
