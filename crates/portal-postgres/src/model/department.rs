use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::departments;

/// Organizational unit that dashboards are granted to.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Department {
    pub id: i32,
    pub name: String,
    pub created_at: Timestamp,
}

/// Data for creating a new department.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDepartment {
    pub name: String,
}
