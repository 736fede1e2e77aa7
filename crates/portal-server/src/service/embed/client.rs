use std::fmt;
use std::sync::Arc;

use reqwest::Client;

use super::payload::{NamedItem, ReportItem, TokenItem};
use super::{EmbedConfig, EmbedCredential, EmbedError, EmbedResult, EmbedTarget, GenerateTokenRequest};
use crate::Result;
use crate::service::identity::{AccessToken, ClientCredentials, IdentityProviderClient};
use crate::utility::tracing_targets::EMBED_CLIENT as TRACING_TARGET;

/// Placeholder shown when the workspace name cannot be loaded.
const UNKNOWN_WORKSPACE: &str = "Unknown Workspace";

/// Placeholder shown when the report carries no name.
const UNKNOWN_REPORT: &str = "Unknown Report";

/// Longest upstream error body carried into an error message.
const MAX_ERROR_BODY: usize = 1024;

struct EmbedClientInner {
    http: Client,
    config: EmbedConfig,
    identity_provider: IdentityProviderClient,
}

/// Client for the BI vendor REST API.
#[derive(Clone)]
pub struct EmbedClient {
    inner: Arc<EmbedClientInner>,
}

impl EmbedClient {
    /// Creates a client; service tokens are acquired through `identity_provider`.
    pub fn new(config: EmbedConfig, identity_provider: IdentityProviderClient) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("portal-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::debug!(
            target: TRACING_TARGET,
            api_url = %config.bi_api_url,
            timeout_secs = config.bi_timeout_secs,
            "Embed client created"
        );

        let inner = EmbedClientInner {
            http,
            config,
            identity_provider,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &EmbedConfig {
        &self.inner.config
    }

    /// Issues a credential with the configured service principal.
    pub async fn issue(
        &self,
        target: &EmbedTarget,
        principal_email: &str,
    ) -> EmbedResult<EmbedCredential> {
        let credentials = self.inner.config.credentials();
        self.issue_with_credentials(&credentials, target, principal_email)
            .await
    }

    /// Issues a credential with explicitly supplied service credentials.
    ///
    /// `principal_email` must come from the verified session; it becomes the
    /// row-level security identity.
    pub async fn issue_with_credentials(
        &self,
        credentials: &ClientCredentials,
        target: &EmbedTarget,
        principal_email: &str,
    ) -> EmbedResult<EmbedCredential> {
        let token = self.service_token(credentials).await?;
        let workspace_name = self.workspace_name(&token, &target.workspace_id).await;
        let report = self.report(&token, target).await?;
        let embed_token = self.generate_token(&token, target, principal_email).await?;

        tracing::info!(
            target: TRACING_TARGET,
            report_id = %target.report_id,
            workspace_id = %target.workspace_id,
            "Embed credential issued"
        );

        Ok(EmbedCredential {
            token: embed_token,
            embed_url: report.embed_url,
            workspace_name,
            report_name: report.name.unwrap_or_else(|| UNKNOWN_REPORT.to_owned()),
        })
    }

    fn url(&self, path: &str) -> String {
        let base = self.inner.config.bi_api_url.trim_end_matches('/');
        format!("{base}/{path}")
    }

    async fn service_token(&self, credentials: &ClientCredentials) -> EmbedResult<AccessToken> {
        self.inner
            .identity_provider
            .acquire_service_token(credentials, &self.inner.config.bi_api_scope)
            .await
            .map_err(|e| {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %e,
                    "Service token acquisition failed"
                );
                EmbedError::UpstreamAuth(e.to_string())
            })
    }

    async fn workspace_name(&self, token: &AccessToken, workspace_id: &str) -> String {
        let response = self
            .inner
            .http
            .get(self.url(&format!("groups/{workspace_id}")))
            .bearer_auth(token.secret())
            .send()
            .await;

        let name = match response {
            Ok(response) if response.status().is_success() => {
                response.json::<NamedItem>().await.ok().and_then(|item| item.name)
            }
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    status = %response.status(),
                    workspace_id,
                    "Workspace lookup returned an error status"
                );
                None
            }
            Err(error) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    error = %error,
                    workspace_id,
                    "Workspace lookup failed"
                );
                None
            }
        };

        name.unwrap_or_else(|| UNKNOWN_WORKSPACE.to_owned())
    }

    async fn report(&self, token: &AccessToken, target: &EmbedTarget) -> EmbedResult<ReportItem> {
        let path = format!(
            "groups/{}/reports/{}",
            target.workspace_id, target.report_id
        );

        let response = self
            .inner
            .http
            .get(self.url(&path))
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|e| EmbedError::ReportLookup(transport_message("Report lookup", &e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                target: TRACING_TARGET,
                status = %status,
                report_id = %target.report_id,
                "Report lookup failed"
            );
            return Err(EmbedError::ReportLookup(format!(
                "Report not found: {}",
                status.as_u16()
            )));
        }

        response
            .json::<ReportItem>()
            .await
            .map_err(|e| EmbedError::ReportLookup(transport_message("Report lookup", &e)))
    }

    async fn generate_token(
        &self,
        token: &AccessToken,
        target: &EmbedTarget,
        principal_email: &str,
    ) -> EmbedResult<String> {
        let body =
            GenerateTokenRequest::new(target, principal_email, &self.inner.config.bi_identity_roles);

        let response = self
            .inner
            .http
            .post(self.url("GenerateToken"))
            .bearer_auth(token.secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| EmbedError::TokenIssuance(transport_message("Token generation", &e)))?;

        let status = response.status();
        if !status.is_success() {
            let text: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();

            tracing::warn!(
                target: TRACING_TARGET,
                status = %status,
                report_id = %target.report_id,
                "Token generation rejected"
            );
            return Err(EmbedError::TokenIssuance(format!(
                "Token generation failed: {text}"
            )));
        }

        let item: TokenItem = response
            .json()
            .await
            .map_err(|e| EmbedError::TokenIssuance(transport_message("Token generation", &e)))?;

        item.token.filter(|t| !t.is_empty()).ok_or_else(|| {
            EmbedError::TokenIssuance("Token generation failed: response carried no token".into())
        })
    }
}

fn transport_message(step: &str, error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("{step} failed: request timed out")
    } else if error.is_connect() {
        format!("{step} failed: connection failed")
    } else {
        format!("{step} failed: {error}")
    }
}

impl fmt::Debug for EmbedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use super::*;
    use crate::service::identity::IdentityProviderConfig;

    #[derive(Clone, Default)]
    struct Mock {
        last_body: Arc<Mutex<Option<Value>>>,
    }

    async fn spawn(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await });
        format!("http://{addr}")
    }

    async fn token() -> Json<Value> {
        Json(json!({ "access_token": "service-token" }))
    }

    async fn group(Path(group): Path<String>) -> (StatusCode, Json<Value>) {
        match group.as_str() {
            "w-1" => (StatusCode::OK, Json(json!({ "name": "Finance" }))),
            _ => (StatusCode::FORBIDDEN, Json(json!({}))),
        }
    }

    async fn report(Path((_, report)): Path<(String, String)>) -> (StatusCode, Json<Value>) {
        match report.as_str() {
            "missing" => (StatusCode::NOT_FOUND, Json(json!({}))),
            _ => (
                StatusCode::OK,
                Json(json!({ "name": "Revenue", "embedUrl": "https://app.example.com/embed?r=1" })),
            ),
        }
    }

    async fn generate(State(mock): State<Mock>, Json(body): Json<Value>) -> (StatusCode, String) {
        let rejected = body["reports"][0]["id"] == "rejected";
        *mock.last_body.lock().unwrap() = Some(body);
        if rejected {
            return (StatusCode::BAD_REQUEST, "{\"error\":\"InvalidRequest\"}".into());
        }
        (StatusCode::OK, json!({ "token": "embed-token" }).to_string())
    }

    async fn setup() -> (EmbedClient, Mock) {
        let mock = Mock::default();
        let router = Router::new()
            .route("/tenant/oauth2/v2.0/token", post(token))
            .route("/api/groups/{group}", get(group))
            .route("/api/groups/{group}/reports/{report}", get(report))
            .route("/api/GenerateToken", post(generate))
            .with_state(mock.clone());
        let base = spawn(router).await;

        let identity = IdentityProviderConfig::new(
            "tenant",
            "client",
            "secret",
            "http://localhost:3000/api/auth/callback",
        )
        .with_authority(&base);
        let identity = IdentityProviderClient::new(identity).unwrap();

        let config = EmbedConfig::new("tenant", "bi-client", "bi-secret")
            .with_api_url(format!("{base}/api"));
        (EmbedClient::new(config, identity).unwrap(), mock)
    }

    fn target(workspace: &str, report: &str) -> EmbedTarget {
        EmbedTarget {
            report_id: report.into(),
            workspace_id: workspace.into(),
            core_dataset_id: "core".into(),
            proxy_dataset_id: Some("proxy".into()),
        }
    }

    #[tokio::test]
    async fn issues_credential_scoped_to_principal() -> anyhow::Result<()> {
        let (client, mock) = setup().await;

        let credential = client.issue(&target("w-1", "r-1"), "ada@example.com").await?;
        assert_eq!(credential.token, "embed-token");
        assert_eq!(credential.workspace_name, "Finance");
        assert_eq!(credential.report_name, "Revenue");
        assert_eq!(
            credential.embed_url.as_deref(),
            Some("https://app.example.com/embed?r=1")
        );

        let body = mock.last_body.lock().unwrap().clone().unwrap();
        assert_eq!(body["identities"][0]["username"], "ada@example.com");
        assert_eq!(body["identities"][0]["roles"], json!(["RM"]));
        assert_eq!(body["datasets"][1]["xmlaPermissions"], "ReadOnly");
        Ok(())
    }

    #[tokio::test]
    async fn workspace_lookup_is_best_effort() -> anyhow::Result<()> {
        let (client, _) = setup().await;

        let credential = client.issue(&target("w-2", "r-1"), "ada@example.com").await?;
        assert_eq!(credential.workspace_name, "Unknown Workspace");
        Ok(())
    }

    #[tokio::test]
    async fn missing_report_aborts() {
        let (client, mock) = setup().await;

        let error = client
            .issue(&target("w-1", "missing"), "ada@example.com")
            .await
            .unwrap_err();
        assert_eq!(error, EmbedError::ReportLookup("Report not found: 404".into()));
        assert!(mock.last_body.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn rejected_generation_carries_body() {
        let (client, _) = setup().await;

        let error = client
            .issue(&target("w-1", "rejected"), "ada@example.com")
            .await
            .unwrap_err();
        assert_eq!(
            error,
            EmbedError::TokenIssuance(
                "Token generation failed: {\"error\":\"InvalidRequest\"}".into()
            )
        );
    }

    #[tokio::test]
    async fn unreachable_identity_provider_is_upstream_auth() {
        let identity = IdentityProviderConfig::new(
            "tenant",
            "client",
            "secret",
            "http://localhost:3000/api/auth/callback",
        )
        .with_authority("http://127.0.0.1:9");
        let identity = IdentityProviderClient::new(identity).unwrap();
        let client = EmbedClient::new(EmbedConfig::new("tenant", "id", "secret"), identity).unwrap();

        let error = client
            .issue(&target("w-1", "r-1"), "ada@example.com")
            .await
            .unwrap_err();
        assert_eq!(error.step(), "service_token");
    }
}
