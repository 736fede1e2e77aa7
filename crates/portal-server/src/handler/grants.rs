//! Department grant handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::middleware::from_fn_with_state;
use axum::http::StatusCode;
use portal_postgres::PgClient;
use portal_postgres::query::GrantRepository;

use crate::extract::{AuthState, Json, Path, PgPool, ValidateJson};
use crate::handler::request::{CreateGrant, GrantPathParams};
use crate::handler::response::{Deleted, ErrorResponse, Grant, Grants, Success};
use crate::handler::utility::fail_open;
use crate::handler::{ErrorKind, Result};
use crate::middleware::require_permission;
use crate::service::{Permission, ServiceState};

/// Tracing target for grant operations.
const TRACING_TARGET: &str = "portal_server::handler::grants";

/// Lists every grant with department and dashboard names.
#[tracing::instrument(skip_all)]
async fn list_grants(State(pg_client): State<PgClient>) -> Result<Json<Success<Grants>>> {
    let grants = fail_open("grants", async {
        let mut conn = PgPool::checkout(&pg_client).await?;
        conn.list_grants().await
    }
    .await)?;

    let response = Grants {
        grants: grants.into_iter().map(Grant::from).collect(),
    };

    Ok(Json(Success::new(response)))
}

fn list_grants_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List grants")
        .description("Returns every department grant, newest first.")
        .response::<200, Json<Success<Grants>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Grants a department access to a dashboard.
#[tracing::instrument(skip_all, fields(user_id = auth_state.user_id))]
async fn create_grant(
    auth_state: AuthState,
    PgPool(mut conn): PgPool,
    ValidateJson(request): ValidateJson<CreateGrant>,
) -> Result<(StatusCode, Json<Success<Grant>>)> {
    let grant = conn
        .create_grant(request.into_model(&auth_state.display_name))
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        grant_id = grant.id,
        department_id = grant.department_id,
        dashboard_id = grant.dashboard_id,
        "Grant created"
    );

    let response = Success::new(Grant::from(grant)).with_message("Permission granted successfully");
    Ok((StatusCode::CREATED, Json(response)))
}

fn create_grant_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create grant")
        .description(
            "Grants a department access to a dashboard. A department can hold at most one \
             grant per dashboard.",
        )
        .response::<201, Json<Success<Grant>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Revokes a grant.
#[tracing::instrument(
    skip_all,
    fields(user_id = auth_state.user_id, grant_id = path_params.grant_id)
)]
async fn delete_grant(
    auth_state: AuthState,
    PgPool(mut conn): PgPool,
    Path(path_params): Path<GrantPathParams>,
) -> Result<Json<Success<Deleted>>> {
    if !conn.delete_grant(path_params.grant_id).await? {
        return Err(ErrorKind::NotFound
            .with_message("Permission not found")
            .with_resource("grant"));
    }

    tracing::info!(target: TRACING_TARGET, "Grant revoked");

    let response = Success::new(Deleted {
        id: path_params.grant_id,
    })
    .with_message("Permission revoked successfully");
    Ok(Json(response))
}

fn delete_grant_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Revoke grant")
        .description("Revokes a grant. The next token request from that department is denied.")
        .response::<200, Json<Success<Deleted>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all grant routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/api/admin/grants",
            get_with(list_grants, list_grants_docs).post_with(create_grant, create_grant_docs),
        )
        .api_route(
            "/api/admin/grants/{grantId}",
            delete_with(delete_grant, delete_grant_docs),
        )
        .route_layer(from_fn_with_state(Permission::ManageGrants, require_permission))
        .with_path_items(|item| item.tag("Administration"))
}
