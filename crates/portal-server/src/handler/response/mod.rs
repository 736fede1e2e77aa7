//! Response types for HTTP handlers.

use std::borrow::Cow;

use schemars::JsonSchema;
use serde::Serialize;

mod administration;
mod authentications;
mod dashboards;
mod embeds;
mod errors;
mod monitors;

pub use administration::*;
pub use authentications::*;
pub use dashboards::*;
pub use embeds::*;
pub use errors::*;
pub use monitors::*;

/// Envelope of every successful response.
///
/// The payload fields sit next to `success` and the optional `message`, so
/// clients read the same flag from successful and failed requests.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[schemars(rename = "{T}Response")]
#[serde(rename_all = "camelCase")]
pub struct Success<T> {
    /// Always `true`.
    pub success: bool,
    /// Message safe to show to the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Cow<'static, str>>,
    /// Endpoint-specific payload.
    #[serde(flatten)]
    pub data: T,
}

impl<T> Success<T> {
    /// Wraps a payload without a message.
    #[inline]
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    /// Sets the user-facing message.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Payload of operations that only report completion.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct Acknowledged {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Payload {
        dashboard_id: i32,
    }

    #[test]
    fn payload_is_flattened_next_to_success() {
        let body = Success::new(Payload { dashboard_id: 7 }).with_message("Dashboard added successfully");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["dashboardId"], 7);
        assert_eq!(json["message"], "Dashboard added successfully");
    }

    #[test]
    fn acknowledgement_has_only_envelope_fields() {
        let json = serde_json::to_value(Success::new(Acknowledged::default())).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true }));
    }
}
