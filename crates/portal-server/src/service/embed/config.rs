use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::service::identity::ClientCredentials;
use crate::{Error, Result};

/// Default BI REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.powerbi.com/v1.0/myorg";

/// Default scope of the service token.
pub const DEFAULT_API_SCOPE: &str = "https://analysis.windows.net/powerbi/api/.default";

/// BI vendor API configuration.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct EmbedConfig {
    /// Tenant of the service principal used for embedding
    #[cfg_attr(feature = "config", arg(long = "bi-tenant-id", env = "BI_TENANT_ID"))]
    pub bi_tenant_id: String,

    /// Client identifier of the service principal used for embedding
    #[cfg_attr(feature = "config", arg(long = "bi-client-id", env = "BI_CLIENT_ID"))]
    pub bi_client_id: String,

    /// Client secret of the service principal used for embedding
    #[cfg_attr(
        feature = "config",
        arg(long = "bi-client-secret", env = "BI_CLIENT_SECRET")
    )]
    pub bi_client_secret: String,

    /// Base URL of the BI REST API
    #[cfg_attr(
        feature = "config",
        arg(long = "bi-api-url", env = "BI_API_URL", default_value = DEFAULT_API_URL)
    )]
    pub bi_api_url: String,

    /// Scope requested for the service token
    #[cfg_attr(
        feature = "config",
        arg(long = "bi-api-scope", env = "BI_API_SCOPE", default_value = DEFAULT_API_SCOPE)
    )]
    pub bi_api_scope: String,

    /// Timeout for each BI API call, in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "bi-timeout-secs", env = "BI_TIMEOUT_SECS", default_value = "5")
    )]
    pub bi_timeout_secs: u64,

    /// Row-level security roles placed in the embed identity
    #[cfg_attr(
        feature = "config",
        arg(
            long = "bi-identity-roles",
            env = "BI_IDENTITY_ROLES",
            default_value = "RM",
            value_delimiter = ','
        )
    )]
    pub bi_identity_roles: Vec<String>,
}

impl EmbedConfig {
    /// Creates a configuration against the default API.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            bi_tenant_id: tenant_id.into(),
            bi_client_id: client_id.into(),
            bi_client_secret: client_secret.into(),
            bi_api_url: DEFAULT_API_URL.to_owned(),
            bi_api_scope: DEFAULT_API_SCOPE.to_owned(),
            bi_timeout_secs: 5,
            bi_identity_roles: vec!["RM".to_owned()],
        }
    }

    /// Overrides the API base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.bi_api_url = api_url.into();
        self
    }

    /// Returns the timeout applied to every call.
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.bi_timeout_secs)
    }

    /// Returns the configured service principal.
    pub fn credentials(&self) -> ClientCredentials {
        ClientCredentials::new(&self.bi_tenant_id, &self.bi_client_id, &self.bi_client_secret)
    }

    /// Validates the API URL, the timeout and the identity roles.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.bi_api_url)
            .map_err(|e| Error::config(format!("Invalid BI API URL: {e}")))?;

        if self.bi_api_scope.trim().is_empty() {
            return Err(Error::config("BI API scope cannot be empty"));
        }

        if !(1..=60).contains(&self.bi_timeout_secs) {
            return Err(Error::config(
                "BI API timeout must be between 1 and 60 seconds",
            ));
        }

        if self.bi_identity_roles.iter().all(|r| r.trim().is_empty()) {
            return Err(Error::config("At least one BI identity role is required"));
        }

        Ok(())
    }
}

impl fmt::Debug for EmbedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedConfig")
            .field("bi_tenant_id", &self.bi_tenant_id)
            .field("bi_client_id", &self.bi_client_id)
            .field("bi_client_secret", &"[REDACTED]")
            .field("bi_api_url", &self.bi_api_url)
            .field("bi_api_scope", &self.bi_api_scope)
            .field("bi_timeout_secs", &self.bi_timeout_secs)
            .field("bi_identity_roles", &self.bi_identity_roles)
            .finish()
    }
}
