//! Department dashboard grants table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Department dashboard grants table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum GrantConstraints {
    #[strum(serialize = "department_dashboards_unique_grant")]
    UniqueGrant,
    #[strum(serialize = "department_dashboards_department_id_fkey")]
    DepartmentReference,
    #[strum(serialize = "department_dashboards_dashboard_id_fkey")]
    DashboardReference,
}

impl GrantConstraints {
    /// Creates a new [`GrantConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            GrantConstraints::UniqueGrant => ConstraintCategory::Uniqueness,
            GrantConstraints::DepartmentReference | GrantConstraints::DashboardReference => {
                ConstraintCategory::Reference
            }
        }
    }
}

impl From<GrantConstraints> for String {
    #[inline]
    fn from(val: GrantConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for GrantConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
