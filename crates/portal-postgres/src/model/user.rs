//! User model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::users;
use crate::types::UserRole;

/// A provisioned portal user.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique user identifier.
    pub id: i32,
    /// Email address verified by the identity provider.
    pub email: String,
    /// Human-readable name.
    pub display_name: String,
    /// Department the user belongs to.
    pub department_id: i32,
    /// Portal-wide role.
    pub role: UserRole,
    /// Timestamp when the user was provisioned.
    pub created_at: Timestamp,
    /// Timestamp of the last change to the user.
    pub updated_at: Timestamp,
}

/// Data for provisioning a new user.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub department_id: i32,
    pub role: UserRole,
}

impl User {
    /// Returns whether the user sees every dashboard.
    #[inline]
    pub fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }
}
