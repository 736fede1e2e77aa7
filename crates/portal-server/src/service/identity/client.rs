use std::fmt;
use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::config::USER_SCOPE;
use super::{
    ClientCredentials, IdentityProviderConfig, IdentityProviderError, IdentityProviderResult,
};
use crate::utility::tracing_targets::IDENTITY_PROVIDER as TRACING_TARGET;

/// Profile fields requested from the Graph API.
const PROFILE_SELECT: &str = "id,displayName,mail,userPrincipalName";

/// Bearer token returned by the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Returns the raw token for an `Authorization` header.
    #[inline]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Verified identity returned by the profile API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    /// `mail`, or `userPrincipalName` when `mail` is empty.
    pub email: String,
    /// `displayName`, or the email when absent.
    pub display_name: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl TokenResponse {
    fn into_token(self) -> Result<AccessToken, String> {
        match self.access_token {
            Some(token) if !token.is_empty() => Ok(AccessToken(token)),
            _ => Err(self
                .error_description
                .or(self.error)
                .unwrap_or_else(|| "Unknown".to_owned())),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    display_name: Option<String>,
    mail: Option<String>,
    user_principal_name: Option<String>,
}

impl ProfileResponse {
    fn into_profile(self) -> Option<IdentityProfile> {
        let email = self
            .mail
            .filter(|mail| !mail.trim().is_empty())
            .or(self.user_principal_name)
            .map(|email| email.trim().to_owned())
            .filter(|email| !email.is_empty())?;

        let display_name = self
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| email.clone());

        Some(IdentityProfile {
            email,
            display_name,
        })
    }
}

struct IdentityProviderClientInner {
    http: Client,
    config: IdentityProviderConfig,
}

/// Client for the enterprise identity provider.
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Clone)]
pub struct IdentityProviderClient {
    inner: Arc<IdentityProviderClientInner>,
}

impl IdentityProviderClient {
    /// Creates a client from a validated configuration.
    pub fn new(config: IdentityProviderConfig) -> IdentityProviderResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("portal-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(IdentityProviderError::Transport)?;

        tracing::debug!(
            target: TRACING_TARGET,
            authority = %config.idp_authority,
            tenant_id = %config.idp_tenant_id,
            timeout_secs = config.idp_timeout_secs,
            "Identity provider client created"
        );

        let inner = IdentityProviderClientInner { http, config };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &IdentityProviderConfig {
        &self.inner.config
    }

    fn endpoint(&self, tenant_id: &str, action: &str) -> String {
        let authority = self.inner.config.idp_authority.trim_end_matches('/');
        format!("{authority}/{tenant_id}/oauth2/v2.0/{action}")
    }

    /// Builds the authorization URL the browser is redirected to.
    pub fn authorize_url(&self, state: &str) -> IdentityProviderResult<Url> {
        let config = &self.inner.config;
        let endpoint = self.endpoint(&config.idp_tenant_id, "authorize");

        Url::parse_with_params(
            &endpoint,
            [
                ("client_id", config.idp_client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", config.idp_redirect_uri.as_str()),
                ("response_mode", "query"),
                ("scope", USER_SCOPE),
                ("state", state),
            ],
        )
        .map_err(|e| IdentityProviderError::config(format!("Invalid authorize URL: {e}")))
    }

    /// Exchanges an authorization code for a user access token.
    pub async fn exchange_code(&self, code: &str) -> IdentityProviderResult<AccessToken> {
        let config = &self.inner.config;
        let endpoint = self.endpoint(&config.idp_tenant_id, "token");

        let response: TokenResponse = self
            .inner
            .http
            .post(&endpoint)
            .form(&[
                ("client_id", config.idp_client_id.as_str()),
                ("client_secret", config.idp_client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", config.idp_redirect_uri.as_str()),
                ("scope", USER_SCOPE),
            ])
            .send()
            .await?
            .json()
            .await?;

        response.into_token().map_err(|description| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %description,
                "Authorization code exchange rejected"
            );
            IdentityProviderError::CodeExchange(description)
        })
    }

    /// Loads the signed-in user's profile.
    pub async fn fetch_profile(
        &self,
        token: &AccessToken,
    ) -> IdentityProviderResult<IdentityProfile> {
        let graph = self.inner.config.idp_graph_url.trim_end_matches('/');
        let endpoint = format!("{graph}/v1.0/me");

        let response = self
            .inner
            .http
            .get(&endpoint)
            .query(&[("$select", PROFILE_SELECT)])
            .bearer_auth(token.secret())
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(
                target: TRACING_TARGET,
                status = %response.status(),
                "Profile request failed"
            );
            return Err(IdentityProviderError::Profile);
        }

        let profile: ProfileResponse = response.json().await?;
        profile.into_profile().ok_or(IdentityProviderError::Profile)
    }

    /// Acquires a machine token with the client-credentials grant.
    pub async fn acquire_service_token(
        &self,
        credentials: &ClientCredentials,
        scope: &str,
    ) -> IdentityProviderResult<AccessToken> {
        let endpoint = self.endpoint(&credentials.tenant_id, "token");

        let response = self
            .inner
            .http
            .post(&endpoint)
            .form(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("grant_type", "client_credentials"),
                ("scope", scope),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IdentityProviderError::ServiceToken("Request timed out".to_owned())
                } else {
                    IdentityProviderError::ServiceToken(e.to_string())
                }
            })?;

        let response: TokenResponse = response
            .json()
            .await
            .map_err(|e| IdentityProviderError::ServiceToken(e.to_string()))?;

        response.into_token().map_err(|description| {
            tracing::warn!(
                target: TRACING_TARGET,
                tenant_id = %credentials.tenant_id,
                client_id = %credentials.client_id,
                error = %description,
                "Client credentials grant rejected"
            );
            IdentityProviderError::ServiceToken(description)
        })
    }
}

impl fmt::Debug for IdentityProviderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityProviderClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::Form;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use super::*;

    async fn spawn(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await });
        format!("http://{addr}")
    }

    fn client(base: &str) -> IdentityProviderClient {
        let config = IdentityProviderConfig::new(
            "tenant",
            "client",
            "secret",
            "http://localhost:3000/api/auth/callback",
        )
        .with_authority(base)
        .with_graph_url(base);
        IdentityProviderClient::new(config).unwrap()
    }

    async fn token(Form(form): Form<Vec<(String, String)>>) -> (StatusCode, Json<Value>) {
        let field = |name: &str| {
            form.iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };

        match (field("grant_type").as_str(), field("code").as_str()) {
            ("authorization_code", "good-code") => {
                (StatusCode::OK, Json(json!({ "access_token": "user-token" })))
            }
            ("client_credentials", _) if field("client_secret") == "secret" => {
                (StatusCode::OK, Json(json!({ "access_token": "service-token" })))
            }
            _ => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_grant",
                    "error_description": "AADSTS70008: The code has expired."
                })),
            ),
        }
    }

    async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "Bearer user-token");
        if !authorized {
            return (StatusCode::UNAUTHORIZED, Json(json!({})));
        }

        (
            StatusCode::OK,
            Json(json!({
                "id": "1",
                "displayName": null,
                "mail": "",
                "userPrincipalName": "Ada@Example.com"
            })),
        )
    }

    fn router() -> Router {
        Router::new()
            .route("/tenant/oauth2/v2.0/token", post(token))
            .route("/v1.0/me", get(me))
    }

    #[test]
    fn authorize_url_carries_state_and_scope() {
        let client = client("https://login.example.com");
        let url = client.authorize_url("state-123").unwrap();

        assert_eq!(url.path(), "/tenant/oauth2/v2.0/authorize");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("state".into(), "state-123".into())));
        assert!(pairs.contains(&("scope".into(), "User.Read".into())));
        assert!(pairs.contains(&(
            "redirect_uri".into(),
            "http://localhost:3000/api/auth/callback".into()
        )));
    }

    #[tokio::test]
    async fn code_exchange_and_profile() -> anyhow::Result<()> {
        let base = spawn(router()).await;
        let client = client(&base);

        let token = client.exchange_code("good-code").await?;
        assert_eq!(token.secret(), "user-token");

        let profile = client.fetch_profile(&token).await?;
        assert_eq!(profile.email, "Ada@Example.com");
        assert_eq!(profile.display_name, "Ada@Example.com");
        Ok(())
    }

    #[tokio::test]
    async fn rejected_code_carries_description() {
        let base = spawn(router()).await;
        let error = client(&base).exchange_code("stale").await.unwrap_err();

        assert!(matches!(error, IdentityProviderError::CodeExchange(_)));
        assert_eq!(
            error.to_string(),
            "Authentication Error: AADSTS70008: The code has expired."
        );
    }

    #[tokio::test]
    async fn client_credentials_grant() -> anyhow::Result<()> {
        let base = spawn(router()).await;
        let client = client(&base);

        let good = ClientCredentials::new("tenant", "client", "secret");
        let token = client.acquire_service_token(&good, "scope/.default").await?;
        assert_eq!(token.secret(), "service-token");

        let bad = ClientCredentials::new("tenant", "client", "wrong");
        let error = client
            .acquire_service_token(&bad, "scope/.default")
            .await
            .unwrap_err();
        assert!(matches!(error, IdentityProviderError::ServiceToken(_)));
        Ok(())
    }
}
