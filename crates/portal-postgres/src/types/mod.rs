//! Contains constraints, enumerations and other custom types.

mod constraints;
mod enums;

pub use constraints::{
    ConstraintCategory, ConstraintViolation, DashboardConstraints, DepartmentConstraints,
    GrantConstraints, UserConstraints,
};
pub use enums::{DashboardStatus, LogAction, UserRole};
