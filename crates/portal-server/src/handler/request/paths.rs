//! Path parameter types for HTTP handlers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Path parameters for dashboard operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPathParams {
    /// Unique identifier of the dashboard.
    pub dashboard_id: i32,
}

/// Path parameters for grant operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrantPathParams {
    /// Unique identifier of the grant.
    pub grant_id: i32,
}

/// Path parameters for user operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPathParams {
    /// Unique identifier of the user.
    pub user_id: i32,
}
