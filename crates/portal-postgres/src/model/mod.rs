//! Database models for all tables.
//!
//! Each table has a queryable model plus `New*` insertables and, where rows are
//! mutable, an `Update*` changeset.

mod dashboard;
mod department;
mod department_dashboard;
mod user;
mod user_log;

pub use dashboard::{Dashboard, NewDashboard, UpdateDashboard};
pub use department::{Department, NewDepartment};
pub use department_dashboard::{DepartmentDashboard, GrantDetails, NewDepartmentDashboard};
pub use user::{NewUser, User};
pub use user_log::{NewUserLog, UserLog};
