//! Middleware configuration for the HTTP server.
//!
//! ```bash
//! portal --cors-origins "https://portal.example.com" --request-timeout 60
//! ```

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;
use portal_server::middleware::{CorsConfig, OpenApiConfig, RecoveryConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// CORS, OpenAPI and recovery settings.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Origins allowed to call the API with the session cookie.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Paths of the OpenAPI document and Scalar UI.
    #[clap(flatten)]
    pub openapi: OpenApiConfig,

    /// Request timeout.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Validates the request timeout and documentation paths.
    pub fn validate(&self) -> AnyhowResult<()> {
        let timeout = self.recovery.request_timeout_secs;
        if timeout == 0 || timeout > 300 {
            return Err(anyhow!(
                "Request timeout {timeout} seconds is invalid. Must be between 1 and 300 seconds."
            ));
        }

        if self.openapi.enabled {
            for path in [&self.openapi.open_api_json, &self.openapi.scalar_ui] {
                if !path.starts_with('/') {
                    return Err(anyhow!("Documentation path {path:?} must start with '/'"));
                }
            }
        }

        Ok(())
    }

    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            cors_origins = ?self.cors.allowed_origins,
            cors_credentials = self.cors.allow_credentials,
            openapi_enabled = self.openapi.enabled,
            openapi_path = %self.openapi.open_api_json,
            scalar_path = %self.openapi.scalar_ui,
            request_timeout_secs = self.recovery.request_timeout_secs,
            "Middleware configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MiddlewareConfig {
        MiddlewareConfig {
            cors: CorsConfig::default(),
            openapi: OpenApiConfig::default(),
            recovery: RecoveryConfig::default(),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = config();
        config.recovery = RecoveryConfig::with_timeout_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn relative_documentation_path_is_rejected() {
        let mut config = config();
        config.openapi.scalar_ui = "scalar".into();
        assert!(config.validate().is_err());

        config.openapi.enabled = false;
        assert!(config.validate().is_ok());
    }
}
