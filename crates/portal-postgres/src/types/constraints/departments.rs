//! Departments table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Departments table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum DepartmentConstraints {
    #[strum(serialize = "departments_name_not_empty")]
    NameNotEmpty,
    #[strum(serialize = "departments_name_unique")]
    NameUnique,
}

impl DepartmentConstraints {
    /// Creates a new [`DepartmentConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            DepartmentConstraints::NameNotEmpty => ConstraintCategory::Validation,
            DepartmentConstraints::NameUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<DepartmentConstraints> for String {
    #[inline]
    fn from(val: DepartmentConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for DepartmentConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
