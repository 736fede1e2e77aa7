//! Grant request types.

use portal_postgres::model::NewDepartmentDashboard;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for granting a department access to a dashboard.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGrant {
    /// Department receiving the grant.
    #[validate(range(min = 1, message = "Department and Dashboard are required"))]
    pub department_id: i32,
    /// Dashboard being granted.
    #[validate(range(min = 1, message = "Department and Dashboard are required"))]
    pub dashboard_id: i32,
}

impl CreateGrant {
    /// Converts this request into a grant row attributed to `granted_by`.
    #[inline]
    pub fn into_model(self, granted_by: impl Into<String>) -> NewDepartmentDashboard {
        NewDepartmentDashboard {
            department_id: self.department_id,
            dashboard_id: self.dashboard_id,
            granted_by: granted_by.into(),
        }
    }
}
