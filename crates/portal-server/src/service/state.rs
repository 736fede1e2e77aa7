//! Application state and dependency injection.

use portal_postgres::PgClient;

use crate::Result;
use crate::service::{
    AuditLogWriter, EmbedClient, IdentityProviderClient, IdentityResolver, ServiceConfig,
    SessionKeys,
};
use crate::utility::tracing_targets::SERVICE_STATE as TRACING_TARGET;

/// Application state.
///
/// Holds only immutable, cheaply cloneable handles. Used for the [`State`]
/// extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pg_client: PgClient,
    identity_provider: IdentityProviderClient,
    embed_client: EmbedClient,

    session_keys: SessionKeys,
    identity_resolver: IdentityResolver,
    audit_log: AuditLogWriter,
}

impl ServiceState {
    /// Connects to Postgres, applies migrations and builds every service.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let pg_client = config.connect_postgres().await?;
        Self::with_pg_client(config, pg_client)
    }

    /// Builds every service around an existing database client.
    pub fn with_pg_client(config: &ServiceConfig, pg_client: PgClient) -> Result<Self> {
        let identity_provider = config.create_identity_provider()?;
        let embed_client = config.create_embed_client(identity_provider.clone())?;

        let service_state = Self {
            identity_resolver: IdentityResolver::new(pg_client.clone()),
            audit_log: AuditLogWriter::new(pg_client.clone()),
            session_keys: config.load_session_keys()?,

            pg_client,
            identity_provider,
            embed_client,
        };

        tracing::info!(target: TRACING_TARGET, "Service state initialized");
        Ok(service_state)
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient);
impl_di!(identity_provider: IdentityProviderClient);
impl_di!(embed_client: EmbedClient);

impl_di!(session_keys: SessionKeys);
impl_di!(identity_resolver: IdentityResolver);
impl_di!(audit_log: AuditLogWriter);
