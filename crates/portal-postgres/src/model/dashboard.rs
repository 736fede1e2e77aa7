//! Dashboard model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::dashboards;
use crate::types::DashboardStatus;

/// Registered BI dashboard with the vendor references needed for embedding.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = dashboards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Dashboard {
    /// Unique dashboard identifier.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Vendor report reference.
    pub report_id: String,
    /// Vendor workspace (group) reference.
    pub workspace_id: String,
    /// Core dataset the embed credential is scoped to.
    pub core_dataset_id: String,
    /// Optional secondary dataset included in the embed credential.
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

/// Data for registering a new dashboard.
#[derive(Debug, Clone, Default, Insertable)]
#[diesel(table_name = dashboards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDashboard {
    pub name: String,
    pub report_id: String,
    pub workspace_id: String,
    pub core_dataset_id: String,
    pub proxy_dataset_id: Option<String>,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub status: DashboardStatus,
    pub alert: Option<String>,
    pub created_by: String,
}

/// Full replacement of the editable dashboard fields.
///
/// `None` clears the nullable columns instead of leaving them untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = dashboards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct UpdateDashboard {
    pub name: String,
    pub report_id: String,
    pub workspace_id: String,
    pub core_dataset_id: String,
    pub proxy_dataset_id: Option<String>,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub status: DashboardStatus,
    pub alert: Option<String>,
    pub updated_by: Option<String>,
    pub updated_at: Option<Timestamp>,
}

impl Dashboard {
    /// Returns whether the dashboard is published.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns the dataset identifiers an embed credential is scoped to.
    pub fn dataset_ids(&self) -> Vec<&str> {
        let mut datasets = vec![self.core_dataset_id.as_str()];
        if let Some(proxy) = self.proxy_dataset_id.as_deref() {
            datasets.push(proxy);
        }
        datasets
    }
}
