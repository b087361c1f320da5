//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! - **[`server`]**: router assembly with OpenAPI UIs, health checks, graceful shutdown
//! - **[`http`]**: CORS and security header middleware
//! - **[`errors`]**: structured error responses with error codes
//! - **[`extractors`]**: integer path ids
//! - **[`hal`]**: `application/hal+json` representation models
//! - **[`audit`]**: audit logging for state changes

pub mod audit;
pub mod errors;
pub mod extractors;
pub mod hal;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{
    cors_layer_from_env, create_cors_layer, create_permissive_cors_layer, security_headers,
};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::IdPath;

pub use hal::{EntityModel, HAL_JSON, Hal, Link, Links, PageMetadata, PagedModel, RepresentationModel};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers};
