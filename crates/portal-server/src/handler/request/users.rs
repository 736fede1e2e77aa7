//! User administration request types.

use portal_postgres::types::UserRole;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::{role_name, trimmed_option};

/// Request payload for changing a user's role.
///
/// Role names are matched case-insensitively. Unknown names fail
/// deserialization and are rejected with 400.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRole {
    /// New portal-wide role.
    #[serde(deserialize_with = "role_name")]
    pub role: UserRole,
}

/// Query parameters for the user listing.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    /// Department name to filter by.
    #[serde(default, deserialize_with = "trimmed_option")]
    pub department: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_role_is_rejected() {
        let result = serde_json::from_value::<UpdateRole>(json!({ "role": "owner" }));
        assert!(result.is_err());
    }

    #[test]
    fn role_names_are_lowercase() {
        let request: UpdateRole = serde_json::from_value(json!({ "role": "superuser" })).unwrap();
        assert_eq!(request.role, UserRole::Superuser);
    }

    #[test]
    fn role_names_ignore_case_and_whitespace() {
        for name in ["Admin", " ADMIN ", "admin"] {
            let request: UpdateRole = serde_json::from_value(json!({ "role": name })).unwrap();
            assert_eq!(request.role, UserRole::Admin);
        }
    }

    #[test]
    fn blank_department_filter_is_ignored() {
        let filter: UserFilter = serde_json::from_value(json!({ "department": " " })).unwrap();
        assert_eq!(filter.department, None);
    }
}
