//! Tracing targets shared by modules that do not own a dedicated one.

/// Service state construction and configuration.
pub const SERVICE_STATE: &str = "portal_server::service::state";

/// Authentication extractors and session handling.
pub const AUTHENTICATION: &str = "portal_server::extract::auth";

/// Access policy evaluation.
pub const ACCESS_POLICY: &str = "portal_server::service::policy";

/// Identity provider client.
pub const IDENTITY_PROVIDER: &str = "portal_server::service::identity";

/// BI vendor embed client.
pub const EMBED_CLIENT: &str = "portal_server::service::embed";

/// Audit log writer.
pub const AUDIT_LOG: &str = "portal_server::service::audit";
