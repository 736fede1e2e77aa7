//! Dashboard request types.

use jiff::Timestamp;
use portal_postgres::model::{NewDashboard, UpdateDashboard};
use portal_postgres::types::DashboardStatus;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::validations::{
    REQUIRED_FIELDS_MESSAGE, all_filled, non_blank, trimmed, trimmed_option, validation_error,
};

/// Message shown when an inactive dashboard has no alert.
pub const ALERT_REQUIRED_MESSAGE: &str = "Alert message is required for Inactive dashboards";

/// Request payload for registering or replacing a dashboard.
///
/// Every string is trimmed on the way in. An inactive dashboard must carry an
/// alert, and an active one always drops it.
///
/// # Example
///
/// ```json
/// {
///   "name": "Sales Overview",
///   "reportId": "2f0c...",
///   "workspaceId": "8a1d...",
///   "coreDatasetId": "c41e...",
///   "status": "Inactive",
///   "alert": "Refresh pipeline under maintenance"
/// }
/// ```
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_dashboard"))]
pub struct DashboardInput {
    /// Display name.
    #[serde(default, deserialize_with = "trimmed")]
    pub name: String,
    /// Vendor report reference.
    #[serde(default, deserialize_with = "trimmed")]
    pub report_id: String,
    /// Vendor workspace reference.
    #[serde(default, deserialize_with = "trimmed")]
    pub workspace_id: String,
    /// Core dataset the embed credential is scoped to.
    #[serde(default, deserialize_with = "trimmed")]
    pub core_dataset_id: String,
    /// Optional secondary dataset.
    #[serde(default, deserialize_with = "trimmed_option")]
    pub proxy_dataset_id: Option<String>,
    /// Free-form description.
    #[serde(default, deserialize_with = "trimmed_option")]
    pub description: Option<String>,
    /// Business owner.
    #[serde(default, deserialize_with = "trimmed_option")]
    pub owner: Option<String>,
    /// Publication status, `Active` when omitted.
    #[serde(default)]
    pub status: DashboardStatus,
    /// Message shown while the dashboard is inactive.
    #[serde(default, deserialize_with = "trimmed_option")]
    pub alert: Option<String>,
}

fn validate_dashboard(input: &DashboardInput) -> Result<(), ValidationError> {
    if !input.status.is_active() && non_blank(input.alert.clone()).is_none() {
        return Err(validation_error("alert_required", ALERT_REQUIRED_MESSAGE));
    }

    let required = [
        input.name.as_str(),
        input.report_id.as_str(),
        input.workspace_id.as_str(),
        input.core_dataset_id.as_str(),
    ];

    if !all_filled(&required) {
        return Err(validation_error("required_fields", REQUIRED_FIELDS_MESSAGE));
    }

    Ok(())
}

impl DashboardInput {
    fn alert(&self) -> Option<String> {
        if self.status.is_active() {
            return None;
        }
        non_blank(self.alert.clone())
    }

    /// Converts this request into a [`NewDashboard`] for insertion.
    pub fn into_new_model(self, created_by: impl Into<String>) -> NewDashboard {
        let alert = self.alert();
        NewDashboard {
            name: self.name,
            report_id: self.report_id,
            workspace_id: self.workspace_id,
            core_dataset_id: self.core_dataset_id,
            proxy_dataset_id: non_blank(self.proxy_dataset_id),
            description: non_blank(self.description),
            owner: non_blank(self.owner),
            status: self.status,
            alert,
            created_by: created_by.into(),
        }
    }

    /// Converts this request into an [`UpdateDashboard`] replacing every
    /// editable column.
    pub fn into_update_model(self, updated_by: impl Into<String>) -> UpdateDashboard {
        let alert = self.alert();
        UpdateDashboard {
            name: self.name,
            report_id: self.report_id,
            workspace_id: self.workspace_id,
            core_dataset_id: self.core_dataset_id,
            proxy_dataset_id: non_blank(self.proxy_dataset_id),
            description: non_blank(self.description),
            owner: non_blank(self.owner),
            status: self.status,
            alert,
            updated_by: Some(updated_by.into()),
            updated_at: Some(Timestamp::now().into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn first_message(input: &DashboardInput) -> Option<String> {
        let errors = input.validate().err()?;
        let errors = errors.errors().get("__all__")?.clone();
        let validator::ValidationErrorsKind::Field(list) = errors else {
            return None;
        };
        list.first()?.message.as_ref().map(|m| m.to_string())
    }

    #[test]
    fn strings_are_trimmed_on_deserialize() {
        let input: DashboardInput = serde_json::from_value(json!({
            "name": "  Sales  ",
            "reportId": " r ",
            "workspaceId": "w",
            "coreDatasetId": "c",
            "proxyDatasetId": "   ",
        }))
        .unwrap();

        assert_eq!(input.name, "Sales");
        assert_eq!(input.report_id, "r");
        assert_eq!(input.proxy_dataset_id, None);
        assert_eq!(input.status, DashboardStatus::Active);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn inactive_without_alert_is_rejected_first() {
        let input: DashboardInput = serde_json::from_value(json!({
            "name": "",
            "status": "Inactive",
            "alert": "  ",
        }))
        .unwrap();

        assert_eq!(first_message(&input).as_deref(), Some(ALERT_REQUIRED_MESSAGE));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let input: DashboardInput = serde_json::from_value(json!({
            "name": "Sales",
            "reportId": "r",
            "workspaceId": "w",
        }))
        .unwrap();

        assert_eq!(first_message(&input).as_deref(), Some(REQUIRED_FIELDS_MESSAGE));
    }

    #[test]
    fn active_status_clears_alert() {
        let input: DashboardInput = serde_json::from_value(json!({
            "name": "Sales",
            "reportId": "r",
            "workspaceId": "w",
            "coreDatasetId": "c",
            "status": "Active",
            "alert": "stale message",
        }))
        .unwrap();

        let model = input.into_update_model("Admin");
        assert_eq!(model.alert, None);
        assert_eq!(model.updated_by.as_deref(), Some("Admin"));
        assert!(model.updated_at.is_some());
    }

    #[test]
    fn inactive_status_keeps_alert() {
        let input: DashboardInput = serde_json::from_value(json!({
            "name": "Sales",
            "reportId": "r",
            "workspaceId": "w",
            "coreDatasetId": "c",
            "status": "Inactive",
            "alert": " Under maintenance ",
        }))
        .unwrap();

        assert!(input.validate().is_ok());
        let model = input.into_new_model("Admin");
        assert_eq!(model.alert.as_deref(), Some("Under maintenance"));
        assert_eq!(model.created_by, "Admin");
    }
}
