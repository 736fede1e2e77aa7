//! Embed configuration test response types.

use portal_postgres::types::UserRole;
use schemars::JsonSchema;
use serde::Serialize;

use crate::service::EmbedCredential;

/// Result of a successful configuration test.
#[must_use]
#[derive(Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmbedTest {
    /// Opaque viewer token.
    pub token: String,
    /// Viewer URL of the report.
    pub embed_url: Option<String>,
    /// Name of the vendor workspace.
    pub workspace_name: String,
    /// Name of the vendor report.
    pub report_name: String,
    /// Identity the credential was scoped to.
    pub username_used: String,
    /// Role of that identity in the portal.
    pub role_used: UserRole,
}

impl EmbedTest {
    /// Describes a credential issued for `username` with `role`.
    pub fn new(credential: EmbedCredential, username: impl Into<String>, role: UserRole) -> Self {
        Self {
            token: credential.token,
            embed_url: credential.embed_url,
            workspace_name: credential.workspace_name,
            report_name: credential.report_name,
            username_used: username.into(),
            role_used: role,
        }
    }
}

impl std::fmt::Debug for EmbedTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedTest")
            .field("workspace_name", &self.workspace_name)
            .field("report_name", &self.report_name)
            .field("username_used", &self.username_used)
            .finish_non_exhaustive()
    }
}
