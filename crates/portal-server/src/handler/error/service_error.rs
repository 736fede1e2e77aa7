//! Service error to HTTP error conversion.
//!
//! Upstream failures from the identity provider and the BI API are reported
//! as 400 with the upstream text and are never retried.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::service::{EmbedError, IdentityProviderError, ResolveError};

/// Tracing target for service error conversions.
const TRACING_TARGET: &str = "portal_server::handler::service";

impl From<EmbedError> for HttpError<'static> {
    fn from(error: EmbedError) -> Self {
        tracing::warn!(
            target: TRACING_TARGET,
            step = error.step(),
            error = %error,
            "embed credential issuance failed"
        );

        ErrorKind::UpstreamFailure
            .with_message(error.to_string())
            .with_resource("embed")
            .with_context(error.step())
    }
}

impl From<IdentityProviderError> for HttpError<'static> {
    fn from(error: IdentityProviderError) -> Self {
        match error {
            IdentityProviderError::Config(message) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %message,
                    "identity provider is misconfigured"
                );
                ErrorKind::InternalServerError.with_context(message)
            }
            other => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %other,
                    "identity provider request failed"
                );
                ErrorKind::UpstreamFailure
                    .with_message(other.to_string())
                    .with_resource("identity_provider")
            }
        }
    }
}

impl From<ResolveError> for HttpError<'static> {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::NotFound { .. } => ErrorKind::Forbidden
                .with_message(error.to_string())
                .with_resource("user"),
            ResolveError::Database(pg_error) => pg_error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn embed_errors_carry_upstream_text() {
        let error = HttpError::from(EmbedError::ReportLookup("Report not found: 404".into()));
        assert_eq!(error.kind(), ErrorKind::UpstreamFailure);
        assert_eq!(error.kind().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), Some("Report not found: 404"));
    }

    #[test]
    fn code_exchange_failure_is_bad_request() {
        let error = HttpError::from(IdentityProviderError::CodeExchange("invalid_grant".into()));
        assert_eq!(error.kind().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), Some("Authentication Error: invalid_grant"));
    }

    #[test]
    fn misconfiguration_is_internal() {
        let error = HttpError::from(IdentityProviderError::config("missing tenant"));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.message(), None);
    }

    #[test]
    fn unregistered_email_is_forbidden() {
        let error = HttpError::from(ResolveError::NotFound {
            email: "guest@example.com".into(),
        });
        assert_eq!(error.kind(), ErrorKind::Forbidden);
        assert_eq!(
            error.message(),
            Some("Email guest@example.com is not registered in the system.")
        );
    }
}
