//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Authentication and authorization gates for route groups
//! - Security (CORS, headers, body limits)
//! - Observability (request IDs, tracing spans, request timing)
//! - Recovery (panics, timeouts)
//! - OpenAPI documentation
//!
//! ```rust,no_run
//! use axum::Router;
//! use portal_server::middleware::{
//!     RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_default_security()
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod authentication;
mod authorization;
mod observability;
mod recovery;
mod security;
mod specification;

pub use authentication::require_authentication;
pub use authorization::{require_administration, require_permission};
pub use observability::{RouteCategory, RouterObservabilityExt, track_request_timing};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{
    CorsConfig, FrameOptions, ReferrerPolicy, RouterSecurityExt, SecurityHeadersConfig,
};
pub use specification::{OpenApiConfig, RouterOpenApiExt};
