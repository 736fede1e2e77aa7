//! Embed configuration test request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::validations::{
    REQUIRED_FIELDS_MESSAGE, all_filled, trimmed, trimmed_option, validation_error,
};
use crate::service::{ClientCredentials, EmbedTarget};

/// Request payload for testing a BI configuration before registering it.
///
/// The vendor credentials and references are supplied explicitly. The
/// row-level security identity is always the signed-in principal.
#[must_use]
#[derive(Default, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_embed_test"))]
pub struct EmbedTestRequest {
    /// Tenant of the service principal.
    #[serde(default, deserialize_with = "trimmed")]
    pub tenant_id: String,
    /// Application (client) identifier of the service principal.
    #[serde(default, deserialize_with = "trimmed")]
    pub client_id: String,
    /// Secret of the service principal.
    #[serde(default, deserialize_with = "trimmed")]
    pub client_secret: String,
    /// Vendor report reference.
    #[serde(default, deserialize_with = "trimmed")]
    pub report_id: String,
    /// Vendor workspace reference.
    #[serde(default, deserialize_with = "trimmed", alias = "groupId")]
    pub workspace_id: String,
    /// Core dataset the credential is scoped to.
    #[serde(default, deserialize_with = "trimmed")]
    pub core_dataset_id: String,
    /// Optional secondary dataset.
    #[serde(default, deserialize_with = "trimmed_option")]
    pub proxy_dataset_id: Option<String>,
}

fn validate_embed_test(request: &EmbedTestRequest) -> Result<(), ValidationError> {
    let required = [
        request.tenant_id.as_str(),
        request.client_id.as_str(),
        request.client_secret.as_str(),
        request.report_id.as_str(),
        request.workspace_id.as_str(),
        request.core_dataset_id.as_str(),
    ];

    if !all_filled(&required) {
        return Err(validation_error("required_fields", REQUIRED_FIELDS_MESSAGE));
    }

    Ok(())
}

impl EmbedTestRequest {
    /// Returns the service principal credentials to issue with.
    pub fn credentials(&self) -> ClientCredentials {
        ClientCredentials::new(&self.tenant_id, &self.client_id, &self.client_secret)
    }

    /// Returns the vendor references to embed.
    pub fn target(&self) -> EmbedTarget {
        EmbedTarget {
            report_id: self.report_id.clone(),
            workspace_id: self.workspace_id.clone(),
            core_dataset_id: self.core_dataset_id.clone(),
            proxy_dataset_id: self.proxy_dataset_id.clone(),
        }
    }
}

impl std::fmt::Debug for EmbedTestRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedTestRequest")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("report_id", &self.report_id)
            .field("workspace_id", &self.workspace_id)
            .field("core_dataset_id", &self.core_dataset_id)
            .field("proxy_dataset_id", &self.proxy_dataset_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn group_id_is_accepted_as_workspace() {
        let request: EmbedTestRequest = serde_json::from_value(json!({
            "tenantId": "t",
            "clientId": "c",
            "clientSecret": "s",
            "reportId": "r",
            "groupId": " w ",
            "coreDatasetId": "d",
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.target().workspace_id, "w");
        assert_eq!(request.target().proxy_dataset_id, None);
    }

    #[test]
    fn blank_secret_is_rejected() {
        let request: EmbedTestRequest = serde_json::from_value(json!({
            "tenantId": "t",
            "clientId": "c",
            "clientSecret": "   ",
            "reportId": "r",
            "workspaceId": "w",
            "coreDatasetId": "d",
        }))
        .unwrap();

        assert!(request.validate().is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let request = EmbedTestRequest {
            client_secret: "super-secret".into(),
            ..Default::default()
        };
        assert!(!format!("{request:?}").contains("super-secret"));
    }
}
