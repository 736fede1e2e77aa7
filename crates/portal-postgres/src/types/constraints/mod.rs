//! Database constraint violations organized by table.

mod dashboards;
mod department_dashboards;
mod departments;
mod users;

use std::fmt;

pub use dashboards::DashboardConstraints;
pub use department_dashboards::GrantConstraints;
pub use departments::DepartmentConstraints;
use serde::{Deserialize, Serialize};
pub use users::UserConstraints;

/// Unified constraint violation enum that can represent any named constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    User(UserConstraints),
    Department(DepartmentConstraints),
    Dashboard(DashboardConstraints),
    Grant(GrantConstraints),
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Chronological integrity constraints (timestamp relationships).
    Chronological,
    /// Business logic constraints (domain-specific rules).
    BusinessLogic,
    /// Uniqueness constraints (unique indexes).
    Uniqueness,
    /// Foreign key constraints pointing at a missing row.
    Reference,
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from the constraint name.
    ///
    /// Returns `None` if the constraint name is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use portal_postgres::types::ConstraintViolation;
    ///
    /// let violation = ConstraintViolation::new("department_dashboards_unique_grant");
    /// assert!(violation.is_some());
    ///
    /// let unknown = ConstraintViolation::new("unknown_constraint");
    /// assert!(unknown.is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        if constraint.starts_with("department_dashboards_") {
            GrantConstraints::new(constraint).map(Self::Grant)
        } else if constraint.starts_with("departments_") {
            DepartmentConstraints::new(constraint).map(Self::Department)
        } else if constraint.starts_with("dashboards_") {
            DashboardConstraints::new(constraint).map(Self::Dashboard)
        } else if constraint.starts_with("users_") {
            UserConstraints::new(constraint).map(Self::User)
        } else {
            None
        }
    }

    /// Returns the table name associated with this constraint.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConstraintViolation::User(_) => "users",
            ConstraintViolation::Department(_) => "departments",
            ConstraintViolation::Dashboard(_) => "dashboards",
            ConstraintViolation::Grant(_) => "department_dashboards",
        }
    }

    /// Returns the category of this constraint violation.
    pub fn constraint_category(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::User(c) => c.categorize(),
            ConstraintViolation::Department(c) => c.categorize(),
            ConstraintViolation::Dashboard(c) => c.categorize(),
            ConstraintViolation::Grant(c) => c.categorize(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::User(c) => write!(f, "{c}"),
            ConstraintViolation::Department(c) => write!(f, "{c}"),
            ConstraintViolation::Dashboard(c) => write!(f, "{c}"),
            ConstraintViolation::Grant(c) => write!(f, "{c}"),
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ConstraintViolation::new(&value).ok_or(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_table_prefix() {
        assert_eq!(
            ConstraintViolation::new("department_dashboards_unique_grant"),
            Some(ConstraintViolation::Grant(GrantConstraints::UniqueGrant))
        );
        assert_eq!(
            ConstraintViolation::new("departments_name_unique"),
            Some(ConstraintViolation::Department(
                DepartmentConstraints::NameUnique
            ))
        );
        assert_eq!(
            ConstraintViolation::new("dashboards_alert_matches_status"),
            Some(ConstraintViolation::Dashboard(
                DashboardConstraints::AlertMatchesStatus
            ))
        );
        assert_eq!(
            ConstraintViolation::new("users_email_unique"),
            Some(ConstraintViolation::User(UserConstraints::EmailUnique))
        );
        assert_eq!(ConstraintViolation::new("projects_name_unique"), None);
    }

    #[test]
    fn categories() {
        let grant = ConstraintViolation::Grant(GrantConstraints::UniqueGrant);
        assert_eq!(grant.constraint_category(), ConstraintCategory::Uniqueness);
        assert_eq!(grant.table_name(), "department_dashboards");

        let fkey = ConstraintViolation::Grant(GrantConstraints::DashboardReference);
        assert_eq!(fkey.constraint_category(), ConstraintCategory::Reference);
    }

    #[test]
    fn string_round_trip() {
        let value = ConstraintViolation::Dashboard(DashboardConstraints::RequiredNotEmpty);
        let name: String = value.clone().into();
        assert_eq!(name, "dashboards_required_not_empty");
        assert_eq!(ConstraintViolation::try_from(name), Ok(value));
    }
}
