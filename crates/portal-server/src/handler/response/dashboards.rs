//! Dashboard response types.

use jiff::Timestamp;
use portal_postgres::model;
use portal_postgres::types::DashboardStatus;
use schemars::JsonSchema;
use serde::Serialize;

use crate::service::EmbedCredential;

/// A registered dashboard.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Unique identifier of the dashboard.
    pub dashboard_id: i32,
    /// Display name.
    pub name: String,
    /// Vendor report reference.
    pub report_id: String,
    /// Vendor workspace reference.
    pub workspace_id: String,
    /// Core dataset reference.
    pub core_dataset_id: String,
    /// Optional secondary dataset reference.
    pub proxy_dataset_id: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Business owner.
    pub owner: Option<String>,
    /// Publication status.
    pub status: DashboardStatus,
    /// Message shown while the dashboard is inactive.
    pub alert: Option<String>,
    /// Name of the admin who registered the dashboard.
    pub created_by: String,
    /// Name of the admin who last changed the dashboard.
    pub updated_by: Option<String>,
    /// Timestamp when the dashboard was registered.
    pub created_at: Timestamp,
    /// Timestamp of the last change.
    pub updated_at: Option<Timestamp>,
}

impl From<model::Dashboard> for Dashboard {
    fn from(dashboard: model::Dashboard) -> Self {
        Self {
            dashboard_id: dashboard.id,
            name: dashboard.name,
            report_id: dashboard.report_id,
            workspace_id: dashboard.workspace_id,
            core_dataset_id: dashboard.core_dataset_id,
            proxy_dataset_id: dashboard.proxy_dataset_id,
            description: dashboard.description,
            owner: dashboard.owner,
            status: dashboard.status,
            alert: dashboard.alert,
            created_by: dashboard.created_by,
            updated_by: dashboard.updated_by,
            created_at: dashboard.created_at.into(),
            updated_at: dashboard.updated_at.map(Into::into),
        }
    }
}

/// Dashboards listing.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct Dashboards {
    /// Dashboards, identifier descending.
    pub dashboards: Vec<Dashboard>,
}

impl Dashboards {
    /// Converts database rows into a listing.
    pub fn from_models(dashboards: Vec<model::Dashboard>) -> Self {
        Self {
            dashboards: dashboards.into_iter().map(Into::into).collect(),
        }
    }
}

/// Department summary shown on the home view.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    /// Unique identifier of the department.
    pub department_id: i32,
    /// Department name.
    pub name: String,
    /// Timestamp when the department was created.
    pub created_at: Timestamp,
}

impl From<model::Department> for Department {
    fn from(department: model::Department) -> Self {
        Self {
            department_id: department.id,
            name: department.name,
            created_at: department.created_at.into(),
        }
    }
}

/// Home view of the signed-in user.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Home {
    /// Department of the user, absent when it cannot be loaded.
    pub department: Option<Department>,
    /// Dashboards visible to the user, identifier descending.
    pub dashboards: Vec<Dashboard>,
}

/// Embed credential for one dashboard.
#[must_use]
#[derive(Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmbedToken {
    /// Opaque viewer token.
    pub token: String,
    /// Viewer URL of the report.
    pub embed_url: Option<String>,
    /// Vendor report reference.
    pub report_id: String,
    /// Name of the vendor workspace.
    pub workspace_name: String,
    /// Name of the vendor report.
    pub report_name: String,
    /// Display name of the dashboard.
    pub dashboard_name: String,
}

impl EmbedToken {
    /// Combines an issued credential with the dashboard it was issued for.
    pub fn new(credential: EmbedCredential, dashboard: &model::Dashboard) -> Self {
        Self {
            token: credential.token,
            embed_url: credential.embed_url,
            report_id: dashboard.report_id.clone(),
            workspace_name: credential.workspace_name,
            report_name: credential.report_name,
            dashboard_name: dashboard.name.clone(),
        }
    }
}

impl std::fmt::Debug for EmbedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedToken")
            .field("report_id", &self.report_id)
            .field("dashboard_name", &self.dashboard_name)
            .finish_non_exhaustive()
    }
}
