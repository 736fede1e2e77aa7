//! Dashboard registration handlers.
//!
//! Every mutation requires [`Permission::ManageDashboards`]; superusers can
//! read the listing but not change it.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::middleware::from_fn_with_state;
use axum::http::StatusCode;
use portal_postgres::PgClient;
use portal_postgres::query::DashboardRepository;

use crate::extract::{AuthState, Json, Path, PgPool, ValidateJson};
use crate::handler::request::{DashboardInput, DashboardPathParams};
use crate::handler::response::{Dashboard, Dashboards, Deleted, ErrorResponse, Success};
use crate::handler::utility::fail_open;
use crate::handler::{ErrorKind, Result};
use crate::middleware::require_permission;
use crate::service::{Permission, ServiceState};

/// Tracing target for dashboard registration.
const TRACING_TARGET: &str = "portal_server::handler::managed_dashboards";

/// Lists every registered dashboard.
#[tracing::instrument(skip_all)]
async fn list_all_dashboards(
    State(pg_client): State<PgClient>,
) -> Result<Json<Success<Dashboards>>> {
    let dashboards = fail_open("all dashboards", async {
        let mut conn = PgPool::checkout(&pg_client).await?;
        conn.list_dashboards().await
    }
    .await)?;

    Ok(Json(Success::new(Dashboards::from_models(dashboards))))
}

fn list_all_dashboards_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List all dashboards")
        .description("Returns every registered dashboard, identifier descending.")
        .response::<200, Json<Success<Dashboards>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Registers a dashboard.
#[tracing::instrument(skip_all, fields(user_id = auth_state.user_id))]
async fn create_dashboard(
    auth_state: AuthState,
    PgPool(mut conn): PgPool,
    ValidateJson(request): ValidateJson<DashboardInput>,
) -> Result<(StatusCode, Json<Success<Dashboard>>)> {
    let new_dashboard = request.into_new_model(&auth_state.display_name);
    let dashboard = conn.create_dashboard(new_dashboard).await?;

    tracing::info!(
        target: TRACING_TARGET,
        dashboard_id = dashboard.id,
        status = %dashboard.status,
        "Dashboard created"
    );

    let response = Success::new(Dashboard::from(dashboard))
        .with_message("Dashboard added successfully");
    Ok((StatusCode::CREATED, Json(response)))
}

fn create_dashboard_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create dashboard")
        .description(
            "Registers a dashboard. An inactive dashboard requires an alert message; an \
             active one never keeps one.",
        )
        .response::<201, Json<Success<Dashboard>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Replaces the editable fields of a dashboard.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        dashboard_id = path_params.dashboard_id,
    )
)]
async fn update_dashboard(
    auth_state: AuthState,
    PgPool(mut conn): PgPool,
    Path(path_params): Path<DashboardPathParams>,
    ValidateJson(request): ValidateJson<DashboardInput>,
) -> Result<Json<Success<Dashboard>>> {
    let changes = request.into_update_model(&auth_state.display_name);
    let Some(dashboard) = conn
        .update_dashboard(path_params.dashboard_id, changes)
        .await?
    else {
        return Err(ErrorKind::NotFound
            .with_message("Dashboard not found")
            .with_resource("dashboard"));
    };

    tracing::info!(
        target: TRACING_TARGET,
        status = %dashboard.status,
        "Dashboard updated"
    );

    let response = Success::new(Dashboard::from(dashboard))
        .with_message("Dashboard updated successfully");
    Ok(Json(response))
}

fn update_dashboard_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update dashboard")
        .description(
            "Replaces every editable field. Setting the status to Active clears the alert.",
        )
        .response::<200, Json<Success<Dashboard>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes a dashboard together with its grants.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        dashboard_id = path_params.dashboard_id,
    )
)]
async fn delete_dashboard(
    auth_state: AuthState,
    PgPool(mut conn): PgPool,
    Path(path_params): Path<DashboardPathParams>,
) -> Result<Json<Success<Deleted>>> {
    if !conn.delete_dashboard(path_params.dashboard_id).await? {
        return Err(ErrorKind::NotFound
            .with_message("Dashboard not found")
            .with_resource("dashboard"));
    }

    tracing::info!(target: TRACING_TARGET, "Dashboard deleted");

    let response = Success::new(Deleted {
        id: path_params.dashboard_id,
    })
    .with_message("Dashboard deleted successfully");
    Ok(Json(response))
}

fn delete_dashboard_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete dashboard")
        .description("Deletes a dashboard and every department grant for it.")
        .response::<200, Json<Success<Deleted>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all dashboard registration routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/api/admin/dashboards",
            get_with(list_all_dashboards, list_all_dashboards_docs)
                .post_with(create_dashboard, create_dashboard_docs),
        )
        .api_route(
            "/api/admin/dashboards/{dashboardId}",
            put_with(update_dashboard, update_dashboard_docs)
                .delete_with(delete_dashboard, delete_dashboard_docs),
        )
        .route_layer(from_fn_with_state(Permission::ManageDashboards, require_permission))
        .with_path_items(|item| item.tag("Administration"))
}
