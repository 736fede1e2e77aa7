//! Administration response types.

use jiff::Timestamp;
use portal_postgres::model;
use portal_postgres::query::{DepartmentGrouping as DepartmentGroupingModel, RoleChange};
use portal_postgres::types::{DashboardStatus, LogAction, UserRole};
use schemars::JsonSchema;
use serde::Serialize;

use super::Department;

/// One audit log entry.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Unique identifier of the entry.
    pub log_id: i32,
    /// User the entry belongs to, absent once the user is deleted.
    pub user_id: Option<i32>,
    /// Display name at the time of the event.
    pub user_name: String,
    /// Email at the time of the event.
    pub user_email: String,
    /// Session boundary that was recorded.
    pub action: LogAction,
    /// Timestamp of the event.
    pub created_at: Timestamp,
}

impl From<model::UserLog> for AuditEntry {
    fn from(log: model::UserLog) -> Self {
        Self {
            log_id: log.id,
            user_id: log.user_id,
            user_name: log.user_name,
            user_email: log.user_email,
            action: log.action,
            created_at: log.created_at.into(),
        }
    }
}

/// Administration overview.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Number of registered users.
    pub user_count: i64,
    /// Number of departments.
    pub department_count: i64,
    /// Number of active dashboards.
    pub active_dashboard_count: i64,
    /// Audit log, newest first.
    pub logs: Vec<AuditEntry>,
}

/// Departments listing.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct Departments {
    /// Departments, identifier descending.
    pub departments: Vec<Department>,
}

impl Departments {
    /// Converts database rows into a listing.
    pub fn from_models(departments: Vec<model::Department>) -> Self {
        Self {
            departments: departments.into_iter().map(Into::into).collect(),
        }
    }
}

/// Dashboard reference inside a department grouping.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrantedDashboard {
    /// Unique identifier of the dashboard.
    pub dashboard_id: i32,
    /// Display name.
    pub name: String,
    /// Publication status.
    pub status: DashboardStatus,
}

/// A department with every dashboard it holds a grant for.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentGrouping {
    /// Unique identifier of the department.
    pub department_id: i32,
    /// Department name.
    pub department_name: String,
    /// Granted dashboards, name ascending.
    pub dashboards: Vec<GrantedDashboard>,
}

impl From<DepartmentGroupingModel> for DepartmentGrouping {
    fn from((department, dashboards): DepartmentGroupingModel) -> Self {
        Self {
            department_id: department.id,
            department_name: department.name,
            dashboards: dashboards
                .into_iter()
                .map(|dashboard| GrantedDashboard {
                    dashboard_id: dashboard.id,
                    name: dashboard.name,
                    status: dashboard.status,
                })
                .collect(),
        }
    }
}

/// Department groupings listing.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct DepartmentGroupings {
    /// Departments, name ascending.
    pub departments: Vec<DepartmentGrouping>,
}

/// A department grant.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    /// Unique identifier of the grant.
    pub grant_id: i32,
    /// Department holding the grant.
    pub department_id: i32,
    /// Department name, empty on a freshly created grant.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub department_name: String,
    /// Granted dashboard.
    pub dashboard_id: i32,
    /// Dashboard name, empty on a freshly created grant.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dashboard_name: String,
    /// Name of the admin who issued the grant.
    pub granted_by: String,
    /// Timestamp of the grant.
    pub granted_at: Timestamp,
}

impl From<model::DepartmentDashboard> for Grant {
    fn from(grant: model::DepartmentDashboard) -> Self {
        Self {
            grant_id: grant.id,
            department_id: grant.department_id,
            department_name: String::new(),
            dashboard_id: grant.dashboard_id,
            dashboard_name: String::new(),
            granted_by: grant.granted_by,
            granted_at: grant.granted_at.into(),
        }
    }
}

impl From<model::GrantDetails> for Grant {
    fn from(details: model::GrantDetails) -> Self {
        Self {
            department_name: details.department_name,
            dashboard_name: details.dashboard_name,
            ..Self::from(details.grant)
        }
    }
}

/// Grants listing.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct Grants {
    /// Grants, identifier descending.
    pub grants: Vec<Grant>,
}

/// A registered user with their department.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserEntry {
    /// Unique identifier of the user.
    pub user_id: i32,
    /// Email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Department of the user.
    pub department_id: i32,
    /// Department name.
    pub department_name: String,
    /// Portal-wide role.
    pub role: UserRole,
    /// Timestamp when the user was registered.
    pub created_at: Timestamp,
    /// Timestamp of the last change.
    pub updated_at: Timestamp,
}

impl From<(model::User, model::Department)> for UserEntry {
    fn from((user, department): (model::User, model::Department)) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            display_name: user.display_name,
            department_id: user.department_id,
            department_name: department.name,
            role: user.role,
            created_at: user.created_at.into(),
            updated_at: user.updated_at.into(),
        }
    }
}

/// Users listing.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct Users {
    /// Users, identifier descending.
    pub users: Vec<UserEntry>,
}

/// Outcome of a role change.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdate {
    /// User whose role was changed.
    pub user_id: i32,
    /// Role before the change.
    pub previous_role: UserRole,
    /// Role after the change.
    pub role: UserRole,
    /// Whether the signed-in admin changed their own role.
    pub is_self_update: bool,
}

impl RoleUpdate {
    /// Describes a committed role change made by `actor_id`.
    pub fn new(change: &RoleChange, actor_id: i32) -> Self {
        Self {
            user_id: change.user.id,
            previous_role: change.previous_role,
            role: change.user.role,
            is_self_update: change.user.id == actor_id,
        }
    }
}

/// Identifier of a removed record.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deleted {
    /// Identifier the removed record had.
    pub id: i32,
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn user(id: i32, role: UserRole) -> model::User {
        model::User {
            id,
            email: format!("user{id}@example.com"),
            display_name: format!("User {id}"),
            department_id: 1,
            role,
            created_at: Timestamp::now().into(),
            updated_at: Timestamp::now().into(),
        }
    }

    #[test]
    fn self_update_is_flagged() {
        let change = RoleChange {
            previous_role: UserRole::User,
            user: user(5, UserRole::Admin),
        };

        let own = RoleUpdate::new(&change, 5);
        assert!(own.is_self_update);
        assert_eq!(own.previous_role, UserRole::User);
        assert_eq!(own.role, UserRole::Admin);

        let other = RoleUpdate::new(&change, 9);
        assert!(!other.is_self_update);
    }

    #[test]
    fn grant_names_are_omitted_until_known() {
        let grant = Grant::from(model::DepartmentDashboard {
            id: 1,
            department_id: 2,
            dashboard_id: 3,
            granted_by: "Admin".into(),
            granted_at: Timestamp::now().into(),
        });

        let json = serde_json::to_value(&grant).unwrap();
        assert!(json.get("departmentName").is_none());
        assert_eq!(json["dashboardId"], 3);
    }
}
