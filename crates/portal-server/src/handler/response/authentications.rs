//! Session response types.

use portal_postgres::types::UserRole;
use schemars::JsonSchema;
use serde::Serialize;

use crate::service::{Permission, Principal};

/// The signed-in user.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Unique identifier of the user.
    pub user_id: i32,
    /// Verified email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Department of the user.
    pub department_id: i32,
    /// Portal-wide role.
    pub role: UserRole,
    /// Capabilities granted by the role.
    pub permissions: Vec<Permission>,
}

impl From<&Principal> for CurrentUser {
    fn from(principal: &Principal) -> Self {
        Self {
            user_id: principal.user_id,
            email: principal.email.clone(),
            display_name: principal.display_name.clone(),
            department_id: principal.department_id,
            role: principal.role,
            permissions: principal.permissions().to_vec(),
        }
    }
}
