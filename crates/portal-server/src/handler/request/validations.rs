//! Shared input normalization for request types.

use portal_postgres::types::UserRole;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

/// Message shown when any mandatory field is blank.
pub const REQUIRED_FIELDS_MESSAGE: &str = "All required fields must be filled";

pub(super) fn validation_error(code: &'static str, message: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.to_string().into());
    error
}

/// Deserializes a string, trimming surrounding whitespace.
///
/// `null` becomes the empty string, so a missing required field and a blank
/// one fail the same "required fields" rule.
pub(super) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_owned()).unwrap_or_default())
}

/// Deserializes an optional string, trimming it and mapping blank to `None`.
pub(super) fn trimmed_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(non_blank(value))
}

/// Deserializes a [`UserRole`] by name, ignoring case and surrounding
/// whitespace.
pub(super) fn role_name<'de, D>(deserializer: D) -> Result<UserRole, D::Error>
where
    D: Deserializer<'de>,
{
    const ROLES: &[&str] = &["admin", "superuser", "user"];

    let value = String::deserialize(deserializer)?;
    let name = value.trim();
    name.to_lowercase()
        .parse()
        .map_err(|_| D::Error::unknown_variant(name, ROLES))
}

/// Trims an optional string and drops it when blank.
pub(super) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Returns whether every value is non-empty.
pub(super) fn all_filled(values: &[&str]) -> bool {
    values.iter().all(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_becomes_none() {
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(Some(" ds-2 ".into())), Some("ds-2".into()));
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn all_filled_rejects_any_empty_value() {
        assert!(all_filled(&["a", "b"]));
        assert!(!all_filled(&["a", ""]));
    }
}
