//! Sign-in request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Query parameters the identity provider appends to the callback URL.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct CallbackQuery {
    /// Authorization code to exchange.
    pub code: Option<String>,
    /// Value mirrored from the sign-in request.
    pub state: Option<String>,
    /// Error code reported by the identity provider.
    pub error: Option<String>,
    /// Human-readable error reported by the identity provider.
    pub error_description: Option<String>,
}

impl CallbackQuery {
    /// Returns the provider-reported failure, preferring the description.
    pub fn provider_error(&self) -> Option<&str> {
        self.error.as_deref().map(|error| {
            self.error_description
                .as_deref()
                .filter(|description| !description.is_empty())
                .unwrap_or(error)
        })
    }

    /// Returns the authorization code when present and non-empty.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|code| !code.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_preferred() {
        let query = CallbackQuery {
            error: Some("access_denied".into()),
            error_description: Some("User cancelled the sign-in".into()),
            ..Default::default()
        };
        assert_eq!(query.provider_error(), Some("User cancelled the sign-in"));
    }

    #[test]
    fn empty_code_is_missing() {
        let query = CallbackQuery {
            code: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(query.code(), None);
        assert_eq!(query.provider_error(), None);
    }
}
