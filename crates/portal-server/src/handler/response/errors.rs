use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use schemars::JsonSchema;
use serde::Serialize;

/// Tracing target for rendered error responses.
const TRACING_TARGET: &str = "portal_server::handler::errors";

/// JSON body of every failed request.
///
/// `success` is always `false` so clients can branch on the same flag they
/// read from successful payloads.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse<'a> {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error name.
    pub name: Cow<'a, str>,
    /// Message safe to show to the user.
    pub message: Cow<'a, str>,
    /// The resource that the error relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,

    /// Internal context for logs, never serialized.
    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code, never serialized.
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "Invalid request data.",
        StatusCode::BAD_REQUEST,
    );
    pub const CONFLICT: Self =
        Self::new("conflict", "Resource state conflict.", StatusCode::CONFLICT);
    pub const FORBIDDEN: Self = Self::new("forbidden", "Access denied.", StatusCode::FORBIDDEN);
    pub const MALFORMED_SESSION: Self = Self::new(
        "malformed_session",
        "Session is invalid or expired. Please sign in again.",
        StatusCode::UNAUTHORIZED,
    );
    pub const MISSING_PATH_PARAM: Self = Self::new(
        "missing_path_param",
        "Missing path parameter.",
        StatusCode::BAD_REQUEST,
    );
    pub const MISSING_SESSION: Self = Self::new(
        "missing_session",
        "Authentication required.",
        StatusCode::UNAUTHORIZED,
    );
    pub const NOT_FOUND: Self =
        Self::new("not_found", "Resource not found.", StatusCode::NOT_FOUND);
    pub const REQUEST_TIMEOUT: Self = Self::new(
        "request_timeout",
        "Request timed out.",
        StatusCode::REQUEST_TIMEOUT,
    );
    pub const UPSTREAM_FAILURE: Self = Self::new(
        "upstream_failure",
        "Upstream service request failed.",
        StatusCode::BAD_REQUEST,
    );
    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "Internal server error.",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            success: false,
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            resource: None,
            context: None,
            status,
        }
    }

    /// Replaces the default message with a handler-specific one.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the resource the error relates to.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Attaches internal context.
    /// If context already exists, it merges them with a separator.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_context)),
            None => new_context,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        tracing::warn!(
            target: TRACING_TARGET,
            status = %self.status,
            name = %self.name,
            message = %self.message,
            resource = ?self.resource,
            context = ?self.context,
            "HTTP error response"
        );
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_replaced() {
        let response = ErrorResponse::FORBIDDEN
            .with_message("You do not have access to this dashboard");
        assert_eq!(&response.message, "You do not have access to this dashboard");
        assert_eq!(response.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn context_is_merged() {
        let response = ErrorResponse::INTERNAL_SERVER_ERROR
            .with_context("pool exhausted")
            .with_context("waited 5s");
        assert_eq!(response.context.as_deref(), Some("pool exhausted; waited 5s"));
    }

    #[test]
    fn serialization_hides_internal_fields() {
        let response = ErrorResponse::NOT_FOUND
            .with_message("Dashboard not found")
            .with_resource("dashboard")
            .with_context("id 42");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["name"], "not_found");
        assert_eq!(json["message"], "Dashboard not found");
        assert_eq!(json["resource"], "dashboard");
        assert!(json.get("context").is_none());
        assert!(json.get("status").is_none());
    }
}
