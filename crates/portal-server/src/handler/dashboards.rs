//! Dashboard viewing and embed credential handlers.
//!
//! Listings show every dashboard the principal may see, inactive ones
//! included so their alert can be rendered. Credentials are only issued after
//! a fresh access check against the current grants.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use portal_postgres::{PgClient, PgError};
use portal_postgres::query::{DashboardRepository, DepartmentRepository};

use crate::extract::{AuthState, Json, Path, PgPool};
use crate::handler::request::DashboardPathParams;
use crate::handler::response::{Dashboards, EmbedToken, ErrorResponse, Home, Success};
use crate::handler::utility::fail_open;
use crate::handler::{ErrorKind, Result};
use crate::service::{AccessDecision, AccessPolicy, EmbedClient, EmbedTarget, ServiceState};

/// Tracing target for dashboard operations.
const TRACING_TARGET: &str = "portal_server::handler::dashboards";

/// Lists the dashboards visible to the signed-in user.
#[tracing::instrument(skip_all, fields(user_id = auth_state.user_id))]
async fn list_dashboards(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
) -> Result<Json<Success<Dashboards>>> {
    let principal = auth_state.principal();

    let dashboards = fail_open("dashboards", async {
        let mut conn = PgPool::checkout(&pg_client).await?;
        AccessPolicy::visible_dashboards(&mut conn, principal).await
    }
    .await)?;

    tracing::debug!(
        target: TRACING_TARGET,
        dashboard_count = dashboards.len(),
        "Dashboards listed"
    );

    Ok(Json(Success::new(Dashboards::from_models(dashboards))))
}

fn list_dashboards_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List dashboards")
        .description(
            "Returns every dashboard visible to the signed-in user, identifier descending. \
             Admins and superusers see all dashboards, other users see those granted to \
             their department.",
        )
        .response::<200, Json<Success<Dashboards>>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns the signed-in user's department and visible dashboards.
#[tracing::instrument(skip_all, fields(user_id = auth_state.user_id))]
async fn home(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
) -> Result<Json<Success<Home>>> {
    let principal = auth_state.principal();

    let (department, dashboards) = fail_open("home", async {
        let mut conn = PgPool::checkout(&pg_client).await?;
        let department = conn.find_department_by_id(principal.department_id).await?;
        let dashboards = AccessPolicy::visible_dashboards(&mut conn, principal).await?;
        Ok::<_, PgError>((department, dashboards))
    }
    .await)?;

    let home = Home {
        department: department.map(Into::into),
        dashboards: Dashboards::from_models(dashboards).dashboards,
    };

    Ok(Json(Success::new(home)))
}

fn home_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Home")
        .description("Returns the signed-in user's department and visible dashboards.")
        .response::<200, Json<Success<Home>>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Issues an embed credential for one dashboard.
///
/// The row-level security identity is always the signed-in user's email.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        dashboard_id = path_params.dashboard_id,
    )
)]
async fn issue_token(
    PgPool(mut conn): PgPool,
    State(embed_client): State<EmbedClient>,
    auth_state: AuthState,
    Path(path_params): Path<DashboardPathParams>,
) -> Result<Json<Success<EmbedToken>>> {
    let principal = auth_state.principal();

    let Some(dashboard) = conn.find_dashboard_by_id(path_params.dashboard_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message("Dashboard not found")
            .with_resource("dashboard"));
    };

    match AccessPolicy::check_access(&mut conn, principal, &dashboard).await? {
        AccessDecision::Granted => {}
        AccessDecision::DashboardInactive => {
            return Err(ErrorKind::BadRequest
                .with_message("This dashboard is currently under development")
                .with_resource("dashboard"));
        }
        AccessDecision::NoGrant => {
            return Err(ErrorKind::Forbidden
                .with_message("You do not have access to this dashboard")
                .with_resource("dashboard"));
        }
    }

    // Release the connection before the outbound vendor calls.
    drop(conn);

    let target = EmbedTarget::from(&dashboard);
    let credential = embed_client.issue(&target, &principal.email).await?;

    tracing::info!(
        target: TRACING_TARGET,
        report_id = %dashboard.report_id,
        "Embed credential issued"
    );

    let response = EmbedToken::new(credential, &dashboard);
    Ok(Json(
        Success::new(response).with_message("Report token generated successfully!"),
    ))
}

fn issue_token_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Issue embed token")
        .description(
            "Checks access against the current grants and issues a view-only embed token \
             scoped to the signed-in user.",
        )
        .response::<200, Json<Success<EmbedToken>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all dashboard viewing routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/api/dashboards", get_with(list_dashboards, list_dashboards_docs))
        .api_route(
            "/api/dashboards/{dashboardId}/token",
            post_with(issue_token, issue_token_docs),
        )
        .api_route("/api/home", get_with(home, home_docs))
        .with_path_items(|item| item.tag("Dashboards"))
}
