//! Department dashboard grant model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::department_dashboards;

/// Authorization record letting one department view one dashboard.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = department_dashboards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DepartmentDashboard {
    /// Unique grant identifier.
    pub id: i32,
    /// Department receiving access.
    pub department_id: i32,
    /// Dashboard being shared.
    pub dashboard_id: i32,
    /// Name of the admin who created the grant.
    pub granted_by: String,
    /// Timestamp when the grant was created.
    pub granted_at: Timestamp,
}

/// Data for creating a new grant.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = department_dashboards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDepartmentDashboard {
    pub department_id: i32,
    pub dashboard_id: i32,
    pub granted_by: String,
}

/// A grant joined with the names of the department and dashboard it links.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantDetails {
    pub grant: DepartmentDashboard,
    pub department_name: String,
    pub dashboard_name: String,
}
