//! Audit log model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::user_logs;
use crate::types::LogAction;

/// Immutable record of a session boundary.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = user_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserLog {
    pub id: i32,
    /// Referenced user; cleared if the user is removed.
    pub user_id: Option<i32>,
    /// Display name captured at the time of the event.
    pub user_name: String,
    /// Email captured at the time of the event.
    pub user_email: String,
    pub action: LogAction,
    pub created_at: Timestamp,
}

/// Data for appending a new audit entry.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUserLog {
    pub user_id: Option<i32>,
    pub user_name: String,
    pub user_email: String,
    pub action: LogAction,
}

impl NewUserLog {
    /// Creates a new audit entry for the given user and action.
    pub fn new(
        user_id: i32,
        user_name: impl Into<String>,
        user_email: impl Into<String>,
        action: LogAction,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            user_name: user_name.into(),
            user_email: user_email.into(),
            action,
        }
    }
}
