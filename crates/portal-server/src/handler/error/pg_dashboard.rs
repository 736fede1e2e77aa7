//! Dashboard and grant constraint violation error handlers.

use portal_postgres::types::{DashboardConstraints, GrantConstraints};

use crate::handler::{Error, ErrorKind};

impl From<DashboardConstraints> for Error<'static> {
    fn from(c: DashboardConstraints) -> Self {
        let error = match c {
            DashboardConstraints::RequiredNotEmpty => {
                ErrorKind::BadRequest.with_message("All required fields must be filled")
            }
            DashboardConstraints::AlertMatchesStatus => ErrorKind::BadRequest
                .with_message("Alert message is required for Inactive dashboards"),
            DashboardConstraints::UpdatedAfterCreated => {
                ErrorKind::InternalServerError.into_error()
            }
        };

        error.with_resource("dashboard")
    }
}

impl From<GrantConstraints> for Error<'static> {
    fn from(c: GrantConstraints) -> Self {
        let error = match c {
            GrantConstraints::UniqueGrant => {
                ErrorKind::Conflict.with_message("Permission already exists")
            }
            GrantConstraints::DepartmentReference => {
                ErrorKind::NotFound.with_message("Department not found")
            }
            GrantConstraints::DashboardReference => {
                ErrorKind::NotFound.with_message("Dashboard not found")
            }
        };

        error.with_resource("grant")
    }
}
