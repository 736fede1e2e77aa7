//! Vendor request and response shapes.

use portal_postgres::model::Dashboard;
use serde::{Deserialize, Serialize};

/// Vendor references needed to embed one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedTarget {
    pub report_id: String,
    pub workspace_id: String,
    pub core_dataset_id: String,
    pub proxy_dataset_id: Option<String>,
}

impl EmbedTarget {
    /// Returns the proxy dataset when one is configured.
    pub fn proxy_dataset(&self) -> Option<&str> {
        self.proxy_dataset_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

impl From<&Dashboard> for EmbedTarget {
    fn from(dashboard: &Dashboard) -> Self {
        Self {
            report_id: dashboard.report_id.clone(),
            workspace_id: dashboard.workspace_id.clone(),
            core_dataset_id: dashboard.core_dataset_id.clone(),
            proxy_dataset_id: dashboard.proxy_dataset_id.clone(),
        }
    }
}

/// Issued viewer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct EmbedCredential {
    pub token: String,
    pub embed_url: Option<String>,
    pub workspace_name: String,
    pub report_name: String,
}

impl std::fmt::Debug for EmbedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedCredential")
            .field("embed_url", &self.embed_url)
            .field("workspace_name", &self.workspace_name)
            .field("report_name", &self.report_name)
            .finish_non_exhaustive()
    }
}

/// Dataset entry of a `GenerateToken` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetAccess {
    pub id: String,
    pub xmla_permissions: String,
}

impl DatasetAccess {
    /// Creates a read-only dataset entry.
    pub fn read_only(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            xmla_permissions: "ReadOnly".to_owned(),
        }
    }
}

/// Report or workspace reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReference {
    pub id: String,
}

/// Effective identity used by the vendor for row-level security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveIdentity {
    pub username: String,
    pub roles: Vec<String>,
    pub datasets: Vec<String>,
}

/// Body of the `GenerateToken` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTokenRequest {
    pub datasets: Vec<DatasetAccess>,
    pub reports: Vec<ItemReference>,
    pub target_workspaces: Vec<ItemReference>,
    pub access_level: String,
    pub identities: Vec<EffectiveIdentity>,
}

impl GenerateTokenRequest {
    /// Builds a view-only request scoped to `username`.
    ///
    /// Every dataset is read-only and the identity only covers the core
    /// dataset.
    pub fn new(target: &EmbedTarget, username: &str, roles: &[String]) -> Self {
        let mut datasets = vec![DatasetAccess::read_only(&target.core_dataset_id)];
        if let Some(proxy) = target.proxy_dataset() {
            datasets.push(DatasetAccess::read_only(proxy));
        }

        Self {
            datasets,
            reports: vec![ItemReference {
                id: target.report_id.clone(),
            }],
            target_workspaces: vec![ItemReference {
                id: target.workspace_id.clone(),
            }],
            access_level: "View".to_owned(),
            identities: vec![EffectiveIdentity {
                username: username.to_owned(),
                roles: roles.to_vec(),
                datasets: vec![target.core_dataset_id.clone()],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct NamedItem {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ReportItem {
    pub name: Option<String>,
    pub embed_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenItem {
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn target(proxy: Option<&str>) -> EmbedTarget {
        EmbedTarget {
            report_id: "r-1".into(),
            workspace_id: "w-1".into(),
            core_dataset_id: "core".into(),
            proxy_dataset_id: proxy.map(Into::into),
        }
    }

    #[test]
    fn body_matches_vendor_shape() {
        let request = GenerateTokenRequest::new(&target(None), "ada@example.com", &["RM".into()]);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            json!({
                "datasets": [{ "id": "core", "xmlaPermissions": "ReadOnly" }],
                "reports": [{ "id": "r-1" }],
                "targetWorkspaces": [{ "id": "w-1" }],
                "accessLevel": "View",
                "identities": [{
                    "username": "ada@example.com",
                    "roles": ["RM"],
                    "datasets": ["core"]
                }]
            })
        );
    }

    #[test]
    fn proxy_dataset_is_read_only_and_outside_identity() {
        let request = GenerateTokenRequest::new(&target(Some("proxy")), "ada@example.com", &["RM".into()]);

        assert_eq!(request.datasets.len(), 2);
        assert!(request.datasets.iter().all(|d| d.xmla_permissions == "ReadOnly"));
        assert_eq!(request.datasets[1].id, "proxy");
        assert_eq!(request.identities[0].datasets, vec!["core".to_string()]);
    }

    #[test]
    fn blank_proxy_is_ignored() {
        let request = GenerateTokenRequest::new(&target(Some("  ")), "ada@example.com", &["RM".into()]);
        assert_eq!(request.datasets.len(), 1);
    }
}
