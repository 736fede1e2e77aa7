//! Administration overview and department handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use portal_postgres::query::{
    DashboardRepository, DepartmentRepository, GrantRepository, UserLogRepository,
    UserRepository,
};
use portal_postgres::types::DashboardStatus;
use portal_postgres::{PgClient, PgError};

use crate::extract::{AuthState, Json, PgPool};
use crate::handler::Result;
use crate::handler::response::{
    AuditEntry, DepartmentGroupings, Departments, ErrorResponse, Overview, Success,
};
use crate::handler::utility::fail_open;
use crate::service::ServiceState;

/// Tracing target for administration overview operations.
const TRACING_TARGET: &str = "portal_server::handler::overview";

/// Returns headline counts and the audit log.
#[tracing::instrument(skip_all, fields(user_id = auth_state.user_id))]
async fn overview(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
) -> Result<Json<Success<Overview>>> {
    let overview = fail_open("overview", async {
        let mut conn = PgPool::checkout(&pg_client).await?;
        let user_count = conn.count_users().await?;
        let department_count = conn.count_departments().await?;
        let active_dashboard_count = conn
            .count_dashboards_by_status(DashboardStatus::Active)
            .await?;
        let logs = conn.list_user_logs().await?;

        Ok::<_, PgError>(Overview {
            user_count,
            department_count,
            active_dashboard_count,
            logs: logs.into_iter().map(AuditEntry::from).collect(),
        })
    }
    .await)?;

    tracing::debug!(
        target: TRACING_TARGET,
        user_count = overview.user_count,
        log_count = overview.logs.len(),
        "Overview loaded"
    );

    Ok(Json(Success::new(overview)))
}

fn overview_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Administration overview")
        .description(
            "Returns the number of users, departments and active dashboards, plus every \
             sign-in and sign-out entry, newest first.",
        )
        .response::<200, Json<Success<Overview>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Lists every department.
#[tracing::instrument(skip_all)]
async fn list_departments(State(pg_client): State<PgClient>) -> Result<Json<Success<Departments>>> {
    let departments = fail_open("departments", async {
        let mut conn = PgPool::checkout(&pg_client).await?;
        conn.list_departments().await
    }
    .await)?;

    Ok(Json(Success::new(Departments::from_models(departments))))
}

fn list_departments_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List departments")
        .description("Returns every department, identifier descending.")
        .response::<200, Json<Success<Departments>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Lists departments with the dashboards granted to each.
#[tracing::instrument(skip_all)]
async fn list_department_groupings(
    State(pg_client): State<PgClient>,
) -> Result<Json<Success<DepartmentGroupings>>> {
    let groupings = fail_open("department groupings", async {
        let mut conn = PgPool::checkout(&pg_client).await?;
        conn.list_department_groupings().await
    }
    .await)?;

    let response = DepartmentGroupings {
        departments: groupings.into_iter().map(Into::into).collect(),
    };

    Ok(Json(Success::new(response)))
}

fn list_department_groupings_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List department access")
        .description("Returns departments with their granted dashboards, both name ascending.")
        .response::<200, Json<Success<DepartmentGroupings>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with the overview and department routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/api/admin/overview", get_with(overview, overview_docs))
        .api_route(
            "/api/admin/departments",
            get_with(list_departments, list_departments_docs),
        )
        .api_route(
            "/api/admin/departments/dashboards",
            get_with(list_department_groupings, list_department_groupings_docs),
        )
        .with_path_items(|item| item.tag("Administration"))
}
