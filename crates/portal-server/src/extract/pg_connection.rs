//! PostgreSQL connection extractor for request handlers.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut};
use portal_postgres::{PgClient, PgConn, PgError};

use crate::handler::{Error, ErrorKind};

/// Tracing target for connection checkout.
const TRACING_TARGET: &str = "portal_server::extract::pg_connection";

/// A pooled database connection checked out for one request.
///
/// Derefs to the connection, so every repository trait is callable on it:
///
/// ```rust,ignore
/// async fn list(PgPool(mut conn): PgPool) -> Result<()> {
///     let dashboards = conn.list_dashboards().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Deref, DerefMut)]
pub struct PgPool(pub PgConn);

impl PgPool {
    /// Checks a connection out of the pool.
    pub async fn checkout(pg_client: &PgClient) -> Result<Self, PgError> {
        pg_client.get_connection().await.map(Self)
    }
}

impl<S> FromRequestParts<S> for PgPool
where
    PgClient: FromRef<S>,
    S: Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pg_client = PgClient::from_ref(state);
        Self::checkout(&pg_client).await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "Failed to acquire database connection"
            );
            ErrorKind::InternalServerError
                .with_message("Database connection failed")
                .with_context(e.to_string())
        })
    }
}

impl aide::OperationInput for PgPool {}
