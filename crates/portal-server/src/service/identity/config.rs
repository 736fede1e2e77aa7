use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use super::IdentityProviderError;

/// Default authority host of the identity provider.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Default base URL of the profile (Graph) API.
pub const DEFAULT_GRAPH_URL: &str = "https://graph.microsoft.com";

/// Scope requested for end-user sign in.
pub const USER_SCOPE: &str = "User.Read";

/// Identity provider configuration for end-user sign in.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct IdentityProviderConfig {
    /// Directory (tenant) identifier
    #[cfg_attr(feature = "config", arg(long = "idp-tenant-id", env = "IDP_TENANT_ID"))]
    pub idp_tenant_id: String,

    /// Application (client) identifier used for sign in
    #[cfg_attr(feature = "config", arg(long = "idp-client-id", env = "IDP_CLIENT_ID"))]
    pub idp_client_id: String,

    /// Application client secret used for sign in
    #[cfg_attr(
        feature = "config",
        arg(long = "idp-client-secret", env = "IDP_CLIENT_SECRET")
    )]
    pub idp_client_secret: String,

    /// Authority host, without the tenant segment
    #[cfg_attr(
        feature = "config",
        arg(long = "idp-authority", env = "IDP_AUTHORITY", default_value = DEFAULT_AUTHORITY)
    )]
    pub idp_authority: String,

    /// Base URL of the profile API
    #[cfg_attr(
        feature = "config",
        arg(long = "idp-graph-url", env = "IDP_GRAPH_URL", default_value = DEFAULT_GRAPH_URL)
    )]
    pub idp_graph_url: String,

    /// Callback URL registered with the identity provider
    #[cfg_attr(
        feature = "config",
        arg(
            long = "idp-redirect-uri",
            env = "IDP_REDIRECT_URI",
            default_value = "http://localhost:3000/api/auth/callback"
        )
    )]
    pub idp_redirect_uri: String,

    /// Timeout for each identity provider call, in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "idp-timeout-secs", env = "IDP_TIMEOUT_SECS", default_value = "5")
    )]
    pub idp_timeout_secs: u64,
}

impl IdentityProviderConfig {
    /// Creates a configuration against the default authority and profile API.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            idp_tenant_id: tenant_id.into(),
            idp_client_id: client_id.into(),
            idp_client_secret: client_secret.into(),
            idp_authority: DEFAULT_AUTHORITY.to_owned(),
            idp_graph_url: DEFAULT_GRAPH_URL.to_owned(),
            idp_redirect_uri: redirect_uri.into(),
            idp_timeout_secs: 5,
        }
    }

    /// Overrides the authority host.
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.idp_authority = authority.into();
        self
    }

    /// Overrides the profile API base URL.
    pub fn with_graph_url(mut self, graph_url: impl Into<String>) -> Self {
        self.idp_graph_url = graph_url.into();
        self
    }

    /// Returns the timeout applied to every call.
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.idp_timeout_secs)
    }

    /// Returns the sign-in application credentials.
    pub fn credentials(&self) -> ClientCredentials {
        ClientCredentials::new(
            &self.idp_tenant_id,
            &self.idp_client_id,
            &self.idp_client_secret,
        )
    }

    /// Validates identifiers, URLs and the timeout.
    pub fn validate(&self) -> Result<(), IdentityProviderError> {
        if self.idp_tenant_id.trim().is_empty() || self.idp_client_id.trim().is_empty() {
            return Err(IdentityProviderError::config(
                "Identity provider tenant and client identifiers are required",
            ));
        }

        if self.idp_client_secret.is_empty() {
            return Err(IdentityProviderError::config(
                "Identity provider client secret is required",
            ));
        }

        for (name, value) in [
            ("authority", &self.idp_authority),
            ("graph URL", &self.idp_graph_url),
            ("redirect URI", &self.idp_redirect_uri),
        ] {
            Url::parse(value).map_err(|e| {
                IdentityProviderError::config(format!("Invalid identity provider {name}: {e}"))
            })?;
        }

        if !(1..=60).contains(&self.idp_timeout_secs) {
            return Err(IdentityProviderError::config(
                "Identity provider timeout must be between 1 and 60 seconds",
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for IdentityProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityProviderConfig")
            .field("idp_tenant_id", &self.idp_tenant_id)
            .field("idp_client_id", &self.idp_client_id)
            .field("idp_client_secret", &"[REDACTED]")
            .field("idp_authority", &self.idp_authority)
            .field("idp_graph_url", &self.idp_graph_url)
            .field("idp_redirect_uri", &self.idp_redirect_uri)
            .field("idp_timeout_secs", &self.idp_timeout_secs)
            .finish()
    }
}

/// Application credentials for the client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    /// Creates a new set of credentials.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> IdentityProviderConfig {
        IdentityProviderConfig::new(
            "tenant",
            "client",
            "secret",
            "http://localhost:3000/api/auth/callback",
        )
    }

    #[test]
    fn default_config_is_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn missing_secret_is_rejected() {
        let mut config = config();
        config.idp_client_secret.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_redirect_is_rejected() {
        let mut config = config();
        config.idp_redirect_uri = "not a url".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn secrets_are_redacted() {
        let debug = format!("{:?} {:?}", config(), config().credentials());
        assert!(!debug.contains("\"secret\""));
        assert!(debug.contains("REDACTED"));
    }
}
