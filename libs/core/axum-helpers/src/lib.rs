//! # Axum Helpers
//!
//! Shared HTTP plumbing for the inventory service.
//!
//! - **[`server`]**: router bootstrap with OpenAPI docs, health endpoints, graceful shutdown
//! - **[`http`]**: CORS parsing and security headers
//! - **[`errors`]**: `AppError` and the uniform `{code, error, message, details}` body
//! - **[`extractors`]**: UUID path and validated JSON extractors
//!
//! ```ignore
//! let router = axum_helpers::create_router::<ApiDoc>(api_routes)?;
//! let app = router.merge(health_router(app_info!()));
//! create_production_app(app, &config.server, Duration::from_secs(30), cleanup).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, ShutdownCoordinator, close_postgres, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{parse_allowed_origins, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{UuidPath, ValidatedJson};
