//! Dashboard repository for registration and visibility queries.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{Dashboard, NewDashboard, UpdateDashboard};
use crate::types::DashboardStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for dashboard database operations.
pub trait DashboardRepository {
    /// Registers a new dashboard.
    fn create_dashboard(
        &mut self,
        dashboard: NewDashboard,
    ) -> impl Future<Output = PgResult<Dashboard>> + Send;

    /// Finds a dashboard by identifier.
    fn find_dashboard_by_id(
        &mut self,
        dashboard_id: i32,
    ) -> impl Future<Output = PgResult<Option<Dashboard>>> + Send;

    /// Lists every dashboard, newest identifier first.
    fn list_dashboards(&mut self) -> impl Future<Output = PgResult<Vec<Dashboard>>> + Send;

    /// Lists dashboards granted to a department, newest identifier first.
    fn list_granted_dashboards(
        &mut self,
        department_id: i32,
    ) -> impl Future<Output = PgResult<Vec<Dashboard>>> + Send;

    /// Replaces the editable fields of a dashboard.
    ///
    /// Returns `None` if the dashboard does not exist.
    fn update_dashboard(
        &mut self,
        dashboard_id: i32,
        changes: UpdateDashboard,
    ) -> impl Future<Output = PgResult<Option<Dashboard>>> + Send;

    /// Deletes a dashboard together with its grants.
    ///
    /// Returns whether a row was removed.
    fn delete_dashboard(&mut self, dashboard_id: i32)
    -> impl Future<Output = PgResult<bool>> + Send;

    /// Counts dashboards with the given status.
    fn count_dashboards_by_status(
        &mut self,
        status: DashboardStatus,
    ) -> impl Future<Output = PgResult<i64>> + Send;
}

impl DashboardRepository for PgConnection {
    async fn create_dashboard(&mut self, dashboard: NewDashboard) -> PgResult<Dashboard> {
        use schema::dashboards;

        let dashboard = diesel::insert_into(dashboards::table)
            .values(&dashboard)
            .returning(Dashboard::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(dashboard)
    }

    async fn find_dashboard_by_id(&mut self, dashboard_id: i32) -> PgResult<Option<Dashboard>> {
        use schema::dashboards::dsl::*;

        let dashboard = dashboards
            .filter(id.eq(dashboard_id))
            .select(Dashboard::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(dashboard)
    }

    async fn list_dashboards(&mut self) -> PgResult<Vec<Dashboard>> {
        use schema::dashboards::dsl::*;

        let rows = dashboards
            .order(id.desc())
            .select(Dashboard::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }

    async fn list_granted_dashboards(&mut self, department_id: i32) -> PgResult<Vec<Dashboard>> {
        use schema::{dashboards, department_dashboards};

        let rows = dashboards::table
            .inner_join(department_dashboards::table)
            .filter(department_dashboards::department_id.eq(department_id))
            .order(dashboards::id.desc())
            .select(Dashboard::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }

    async fn update_dashboard(
        &mut self,
        dashboard_id: i32,
        changes: UpdateDashboard,
    ) -> PgResult<Option<Dashboard>> {
        use schema::dashboards::dsl::*;

        let dashboard = diesel::update(dashboards.filter(id.eq(dashboard_id)))
            .set(&changes)
            .returning(Dashboard::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(dashboard)
    }

    async fn delete_dashboard(&mut self, dashboard_id: i32) -> PgResult<bool> {
        use schema::dashboards::dsl::*;

        let affected = diesel::delete(dashboards.filter(id.eq(dashboard_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(affected > 0)
    }

    async fn count_dashboards_by_status(&mut self, dashboard_status: DashboardStatus) -> PgResult<i64> {
        use schema::dashboards::dsl::*;

        let count = dashboards
            .filter(status.eq(dashboard_status))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::model::{NewDepartment, NewDepartmentDashboard};
    use crate::query::test::migrated_client;
    use crate::query::{DepartmentRepository, GrantRepository};

    fn new_dashboard(name: String) -> NewDashboard {
        NewDashboard {
            name,
            report_id: "report".into(),
            workspace_id: "workspace".into(),
            core_dataset_id: "dataset".into(),
            created_by: "Admin".into(),
            ..NewDashboard::default()
        }
    }

    /// Needs a disposable database at `POSTGRES_URL`.
    #[tokio::test]
    #[ignore = "requires a running PostgreSQL"]
    async fn granted_dashboards_are_scoped_to_the_department() -> PgResult<()> {
        let client = migrated_client().await?;
        let mut conn = client.get_connection().await?;

        let suffix = Timestamp::now().as_nanosecond();
        let finance = conn
            .create_department(NewDepartment {
                name: format!("Finance {suffix}"),
            })
            .await?;
        let sales = conn
            .create_department(NewDepartment {
                name: format!("Sales {suffix}"),
            })
            .await?;

        let older = conn
            .create_dashboard(new_dashboard(format!("Revenue {suffix}")))
            .await?;
        let newer = conn
            .create_dashboard(new_dashboard(format!("Margin {suffix}")))
            .await?;
        let other = conn
            .create_dashboard(new_dashboard(format!("Pipeline {suffix}")))
            .await?;

        for (department_id, dashboard_id) in
            [(finance.id, older.id), (finance.id, newer.id), (sales.id, other.id)]
        {
            conn.create_grant(NewDepartmentDashboard {
                department_id,
                dashboard_id,
                granted_by: "Admin".into(),
            })
            .await?;
        }

        let granted = conn.list_granted_dashboards(finance.id).await?;
        let ids: Vec<i32> = granted.iter().map(|dashboard| dashboard.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);

        assert!(conn.delete_dashboard(newer.id).await?);
        let granted = conn.list_granted_dashboards(finance.id).await?;
        let ids: Vec<i32> = granted.iter().map(|dashboard| dashboard.id).collect();
        assert_eq!(ids, vec![older.id]);
        Ok(())
    }
}
