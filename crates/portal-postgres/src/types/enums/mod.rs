//! Enumerations mapped to PostgreSQL enum types.

mod dashboard_status;
mod log_action;
mod user_role;

pub use dashboard_status::DashboardStatus;
pub use log_action::LogAction;
pub use user_role::UserRole;
