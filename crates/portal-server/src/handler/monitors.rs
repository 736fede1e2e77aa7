//! Liveness endpoint.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use portal_postgres::PgClient;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::{DatabaseStatus, Health, Success};
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "portal_server::handler::monitors";

/// Reports liveness and whether the database answers a ping.
#[tracing::instrument(skip_all)]
async fn health(
    State(pg_client): State<PgClient>,
) -> Result<(StatusCode, Json<Success<Health>>)> {
    let database = match pg_client.ping().await {
        Ok(()) => DatabaseStatus::Connected,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "Database ping failed"
            );
            DatabaseStatus::Disconnected
        }
    };

    let status_code = match database {
        DatabaseStatus::Connected => StatusCode::OK,
        DatabaseStatus::Disconnected => StatusCode::SERVICE_UNAVAILABLE,
    };

    tracing::debug!(
        target: TRACING_TARGET,
        status_code = status_code.as_u16(),
        "Health status prepared"
    );

    Ok((status_code, Json(Success::new(Health::new(database)))))
}

fn health_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Health")
        .description("Returns 200 when the database is reachable and 503 otherwise.")
        .response::<200, Json<Success<Health>>>()
        .response::<503, Json<Success<Health>>>()
}

/// Returns a [`Router`] with the health route.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/api/health", get_with(health, health_docs))
        .with_path_items(|item| item.tag("Monitoring"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn unreachable_database_is_unavailable() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server.get("/api/health").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["database"], "disconnected");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        Ok(())
    }
}
