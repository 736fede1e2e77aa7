//! User role enumeration for portal-wide access control.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Defines the portal-wide role of a user.
///
/// This enumeration corresponds to the `USER_ROLE` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::UserRole"]
pub enum UserRole {
    /// Full access, including every administrative mutation.
    #[db_rename = "admin"]
    #[serde(rename = "admin")]
    #[strum(serialize = "admin")]
    Admin,

    /// Read-only elevated visibility across all dashboards and administration views.
    #[db_rename = "superuser"]
    #[serde(rename = "superuser")]
    #[strum(serialize = "superuser")]
    Superuser,

    /// Department-scoped access through grants.
    #[db_rename = "user"]
    #[serde(rename = "user")]
    #[strum(serialize = "user")]
    #[default]
    User,
}

impl UserRole {
    /// Returns whether this role sees every dashboard regardless of grants.
    #[inline]
    pub const fn is_privileged(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Superuser)
    }

    /// Returns whether this role may mutate dashboards, grants and roles.
    #[inline]
    pub const fn is_administrator(self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn parses_lowercase_names() {
        assert_eq!(UserRole::from_str("admin"), Ok(UserRole::Admin));
        assert_eq!(UserRole::from_str("superuser"), Ok(UserRole::Superuser));
        assert_eq!(UserRole::from_str("user"), Ok(UserRole::User));
        assert!(UserRole::from_str("owner").is_err());
    }

    #[test]
    fn privilege_split() {
        assert!(UserRole::Admin.is_privileged());
        assert!(UserRole::Superuser.is_privileged());
        assert!(!UserRole::User.is_privileged());

        assert!(UserRole::Admin.is_administrator());
        assert!(!UserRole::Superuser.is_administrator());
        assert!(!UserRole::User.is_administrator());
    }
}
