//! User and department constraint violation error handlers.

use portal_postgres::types::{DepartmentConstraints, UserConstraints};

use crate::handler::{Error, ErrorKind};

impl From<UserConstraints> for Error<'static> {
    fn from(c: UserConstraints) -> Self {
        let error = match c {
            UserConstraints::EmailNotEmpty => {
                ErrorKind::BadRequest.with_message("Email cannot be empty")
            }
            UserConstraints::EmailUnique => {
                ErrorKind::Conflict.with_message("A user with this email already exists")
            }
            UserConstraints::DepartmentReference => {
                ErrorKind::NotFound.with_message("Department not found")
            }
        };

        error.with_resource("user")
    }
}

impl From<DepartmentConstraints> for Error<'static> {
    fn from(c: DepartmentConstraints) -> Self {
        let error = match c {
            DepartmentConstraints::NameNotEmpty => {
                ErrorKind::BadRequest.with_message("Department name cannot be empty")
            }
            DepartmentConstraints::NameUnique => {
                ErrorKind::Conflict.with_message("Department already exists")
            }
        };

        error.with_resource("department")
    }
}
