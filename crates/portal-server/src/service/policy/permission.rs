//! Role capabilities.

use portal_postgres::types::UserRole;
use schemars::JsonSchema;
use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Capability a role may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, JsonSchema, Display, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Permission {
    /// Sees every dashboard regardless of department grants.
    ViewAllDashboards,
    /// Receives embed credentials for inactive dashboards.
    IssueInactiveDashboards,
    /// Reads the administration views.
    ViewAdministration,
    /// Creates, updates and deletes dashboards.
    ManageDashboards,
    /// Grants and revokes department access.
    ManageGrants,
    /// Changes user roles.
    ManageRoles,
}

impl Permission {
    /// Returns whether the role holds this permission.
    pub const fn is_permitted_by_role(self, role: UserRole) -> bool {
        use UserRole::{Admin, Superuser};

        match self {
            Self::ViewAllDashboards | Self::IssueInactiveDashboards | Self::ViewAdministration => {
                matches!(role, Admin | Superuser)
            }
            Self::ManageDashboards | Self::ManageGrants | Self::ManageRoles => {
                matches!(role, Admin)
            }
        }
    }

    /// Returns whether the permission mutates stored state.
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::ManageDashboards | Self::ManageGrants | Self::ManageRoles
        )
    }
}

/// Permissions resolved for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionSet {
    role: UserRole,
}

impl PermissionSet {
    /// Resolves the permissions held by a role.
    #[inline]
    pub const fn for_role(role: UserRole) -> Self {
        Self { role }
    }

    /// Returns whether the set contains the permission.
    #[inline]
    pub const fn contains(self, permission: Permission) -> bool {
        permission.is_permitted_by_role(self.role)
    }

    /// Returns every permission in the set.
    pub fn to_vec(self) -> Vec<Permission> {
        Permission::iter().filter(|p| self.contains(*p)).collect()
    }
}

/// Resolves the permission set of a [`UserRole`].
pub trait RolePermissions {
    /// Returns the permissions held by this role.
    fn permissions(self) -> PermissionSet;
}

impl RolePermissions for UserRole {
    #[inline]
    fn permissions(self) -> PermissionSet {
        PermissionSet::for_role(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_holds_everything() {
        let set = UserRole::Admin.permissions();
        assert_eq!(set.to_vec().len(), Permission::iter().count());
    }

    #[test]
    fn superuser_has_no_mutations() {
        let set = UserRole::Superuser.permissions();
        assert!(set.contains(Permission::ViewAllDashboards));
        assert!(set.contains(Permission::IssueInactiveDashboards));
        assert!(set.contains(Permission::ViewAdministration));
        for permission in Permission::iter().filter(|p| p.is_mutation()) {
            assert!(!set.contains(permission), "{permission} must be admin-only");
        }
    }

    #[test]
    fn user_has_no_elevated_permissions() {
        assert!(UserRole::User.permissions().to_vec().is_empty());
    }

    #[test]
    fn mutations_are_exactly_the_admin_only_permissions() {
        for permission in Permission::iter() {
            let admin_only = permission.is_permitted_by_role(UserRole::Admin)
                && !permission.is_permitted_by_role(UserRole::Superuser);
            assert_eq!(permission.is_mutation(), admin_only);
        }
    }
}
