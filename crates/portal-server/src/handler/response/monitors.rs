//! Monitor response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::Serialize;

/// Reachability of the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum DatabaseStatus {
    /// A pooled connection answered a ping.
    Connected,
    /// No connection could be checked out or the ping failed.
    Disconnected,
}

/// Liveness report.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    /// Timestamp when this status was generated.
    pub checked_at: Timestamp,
    /// Database reachability.
    pub database: DatabaseStatus,
    /// Application version.
    pub version: String,
}

impl Health {
    /// Creates a report for the given database status.
    pub fn new(database: DatabaseStatus) -> Self {
        Self {
            checked_at: Timestamp::now(),
            database,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
