//! Application state, configuration and domain services.

mod audit;
mod config;
mod embed;
mod identity;
mod policy;
mod security;
mod state;

pub use crate::service::audit::AuditLogWriter;
pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::service::embed::{
    DatasetAccess, EffectiveIdentity, EmbedClient, EmbedConfig, EmbedCredential, EmbedError,
    EmbedResult, EmbedTarget, GenerateTokenRequest, ItemReference,
};
pub use crate::service::identity::{
    AccessToken, ClientCredentials, IdentityProfile, IdentityProviderClient,
    IdentityProviderConfig, IdentityProviderError, IdentityProviderResult, IdentityResolver,
    ResolveError,
};
pub use crate::service::policy::{
    AccessDecision, AccessPolicy, Permission, PermissionSet, Principal, RolePermissions,
};
pub use crate::service::security::{SessionConfig, SessionKeys};
pub use crate::service::state::ServiceState;
// Re-export error types from crate root for convenience
pub use crate::{Error as ServiceError, Result};
