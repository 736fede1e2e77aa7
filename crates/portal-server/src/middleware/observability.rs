//! Observability middleware for request tracing and timing.

use std::net::SocketAddr;
use std::time::Instant;

use axum::Router;
use axum::extract::{ConnectInfo, Request};
use axum::http::{Uri, header};
use axum::middleware::{Next, from_fn};
use axum::response::Response;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

/// Tracing target for request timing.
const TRACING_TARGET: &str = "portal_server::middleware::metrics";

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Layers request IDs, tracing spans and sensitive header redaction.
    ///
    /// The `Cookie` header carries the session token and is never logged.
    fn with_observability(self) -> Self;

    /// Layers per-request timing logs.
    ///
    /// Requires the server to be started with
    /// `into_make_service_with_connect_info::<SocketAddr>()`.
    fn with_metrics(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        self.layer(PropagateRequestIdLayer::new(
            header::HeaderName::from_static("x-request-id"),
        ))
        .layer(SetSensitiveRequestHeadersLayer::new([
            header::AUTHORIZATION,
            header::COOKIE,
        ]))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static("x-request-id"),
            MakeRequestUuid,
        ))
    }

    fn with_metrics(self) -> Self {
        self.layer(from_fn(track_request_timing))
    }
}

/// Coarse grouping of routes for request logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteCategory {
    /// Sign-in, callback and sign-out.
    Authentication,
    /// Administration views and mutations.
    Administration,
    /// Dashboard listings and embed credentials.
    Dashboards,
    /// Health checks and API documentation.
    System,
    /// Anything else.
    Other,
}

impl RouteCategory {
    /// Categorizes a request URI by its path prefix.
    pub fn from_uri(uri: &Uri) -> Self {
        let path = uri.path();
        if path.starts_with("/api/auth") {
            Self::Authentication
        } else if path.starts_with("/api/admin") {
            Self::Administration
        } else if path.starts_with("/api/dashboards")
            || path.starts_with("/api/home")
            || path.starts_with("/api/me")
        {
            Self::Dashboards
        } else if path.starts_with("/api/health")
            || path.starts_with("/api/openapi")
            || path.starts_with("/api/scalar")
        {
            Self::System
        } else {
            Self::Other
        }
    }

    /// Returns the category name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Administration => "administration",
            Self::Dashboards => "dashboards",
            Self::System => "system",
            Self::Other => "other",
        }
    }
}

/// Logs method, route category, status and duration of every request.
pub async fn track_request_timing(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let category = RouteCategory::from_uri(&uri);

    let response = next.run(request).await;
    let duration = start_time.elapsed();

    tracing::debug!(
        target: TRACING_TARGET,
        method = %method,
        path = uri.path(),
        category = category.as_str(),
        status = %response.status(),
        duration_ms = duration.as_millis() as u64,
        client_ip = %addr.ip(),
        "request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_are_categorized() {
        let cases = [
            ("/api/auth/callback?code=x", RouteCategory::Authentication),
            ("/api/admin/grants/3", RouteCategory::Administration),
            ("/api/dashboards/7/token", RouteCategory::Dashboards),
            ("/api/health", RouteCategory::System),
            ("/favicon.ico", RouteCategory::Other),
        ];

        for (uri, category) in cases {
            let uri: Uri = uri.parse().unwrap();
            assert_eq!(RouteCategory::from_uri(&uri), category, "{uri}");
        }
    }
}
