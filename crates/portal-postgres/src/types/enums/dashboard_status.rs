//! Dashboard status enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Publication status of a dashboard.
///
/// This enumeration corresponds to the `DASHBOARD_STATUS` PostgreSQL enum.
/// An inactive dashboard always carries an alert message explaining why.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::DashboardStatus"]
pub enum DashboardStatus {
    /// Published and issuable to every granted department.
    #[db_rename = "active"]
    #[serde(rename = "Active")]
    #[strum(serialize = "Active")]
    #[default]
    Active,

    /// Under development; only privileged roles may open it.
    #[db_rename = "inactive"]
    #[serde(rename = "Inactive")]
    #[strum(serialize = "Inactive")]
    Inactive,
}

impl DashboardStatus {
    /// Returns whether the dashboard is published.
    #[inline]
    pub const fn is_active(self) -> bool {
        matches!(self, DashboardStatus::Active)
    }
}
