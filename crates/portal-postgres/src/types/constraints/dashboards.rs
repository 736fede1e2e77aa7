//! Dashboards table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Dashboards table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum DashboardConstraints {
    #[strum(serialize = "dashboards_required_not_empty")]
    RequiredNotEmpty,
    #[strum(serialize = "dashboards_alert_matches_status")]
    AlertMatchesStatus,
    #[strum(serialize = "dashboards_updated_after_created")]
    UpdatedAfterCreated,
}

impl DashboardConstraints {
    /// Creates a new [`DashboardConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            DashboardConstraints::RequiredNotEmpty => ConstraintCategory::Validation,
            DashboardConstraints::AlertMatchesStatus => ConstraintCategory::BusinessLogic,
            DashboardConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,
        }
    }
}

impl From<DashboardConstraints> for String {
    #[inline]
    fn from(val: DashboardConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for DashboardConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
