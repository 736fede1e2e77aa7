//! Repository traits implemented on [`PgConnection`].
//!
//! Every repository is a trait so handlers can call the operations they need
//! directly on a pooled connection.
//!
//! [`PgConnection`]: crate::PgConnection

mod dashboard;
mod department;
mod department_dashboard;
mod user;
mod user_log;

pub use dashboard::DashboardRepository;
pub use department::DepartmentRepository;
pub use department_dashboard::{DepartmentGrouping, GrantRepository};
pub use user::{RoleChange, UserRepository};
pub use user_log::UserLogRepository;
