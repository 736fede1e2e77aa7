use portal_postgres::model::User;
use portal_postgres::types::UserRole;

use super::{Permission, PermissionSet, RolePermissions};

/// The authenticated identity behind the current request.
///
/// Built from the user row on every request, so a role change or a deleted
/// account takes effect on the next call. Falls back to the signed session
/// claims only while the database is unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub email: String,
    pub display_name: String,
    pub department_id: i32,
    pub role: UserRole,
    permissions: PermissionSet,
}

impl Principal {
    /// Creates a principal and derives its permissions from `role`.
    pub fn new(
        user_id: i32,
        email: impl Into<String>,
        display_name: impl Into<String>,
        department_id: i32,
        role: UserRole,
    ) -> Self {
        Self {
            user_id,
            email: email.into(),
            display_name: display_name.into(),
            department_id,
            permissions: role.permissions(),
            role,
        }
    }

    /// Returns the permissions of the principal's role.
    #[inline]
    pub fn permissions(&self) -> PermissionSet {
        self.permissions
    }

    /// Returns whether the principal holds the permission.
    #[inline]
    pub fn can(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Self::new(
            user.id,
            user.email,
            user.display_name,
            user.department_id,
            user.role,
        )
    }
}
