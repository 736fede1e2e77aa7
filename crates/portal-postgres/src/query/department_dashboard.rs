//! Grant repository linking departments to dashboards.

use std::collections::HashMap;
use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{
    Dashboard, Department, DepartmentDashboard, GrantDetails, NewDepartmentDashboard,
};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// A department together with every dashboard granted to it.
pub type DepartmentGrouping = (Department, Vec<Dashboard>);

/// Repository for department dashboard grants.
pub trait GrantRepository {
    /// Creates a grant.
    ///
    /// A second grant for the same pair violates
    /// `department_dashboards_unique_grant`.
    fn create_grant(
        &mut self,
        grant: NewDepartmentDashboard,
    ) -> impl Future<Output = PgResult<DepartmentDashboard>> + Send;

    /// Revokes a grant by identifier.
    ///
    /// Returns whether a row was removed.
    fn delete_grant(&mut self, grant_id: i32) -> impl Future<Output = PgResult<bool>> + Send;

    /// Checks whether the department holds a grant for the dashboard.
    fn grant_exists(
        &mut self,
        department_id: i32,
        dashboard_id: i32,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists every grant with department and dashboard names, newest first.
    fn list_grants(&mut self) -> impl Future<Output = PgResult<Vec<GrantDetails>>> + Send;

    /// Lists departments by name, each with its granted dashboards by name.
    fn list_department_groupings(
        &mut self,
    ) -> impl Future<Output = PgResult<Vec<DepartmentGrouping>>> + Send;
}

impl GrantRepository for PgConnection {
    async fn create_grant(&mut self, grant: NewDepartmentDashboard) -> PgResult<DepartmentDashboard> {
        use schema::department_dashboards;

        let grant = diesel::insert_into(department_dashboards::table)
            .values(&grant)
            .returning(DepartmentDashboard::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(grant)
    }

    async fn delete_grant(&mut self, grant_id: i32) -> PgResult<bool> {
        use schema::department_dashboards::dsl::*;

        let affected = diesel::delete(department_dashboards.filter(id.eq(grant_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(affected > 0)
    }

    async fn grant_exists(&mut self, dept_id: i32, dash_id: i32) -> PgResult<bool> {
        use schema::department_dashboards::dsl::*;

        let exists = diesel::select(diesel::dsl::exists(
            department_dashboards
                .filter(department_id.eq(dept_id))
                .filter(dashboard_id.eq(dash_id)),
        ))
        .get_result::<bool>(self)
        .await
        .map_err(PgError::from)?;

        Ok(exists)
    }

    async fn list_grants(&mut self) -> PgResult<Vec<GrantDetails>> {
        use schema::{dashboards, department_dashboards, departments};

        let rows: Vec<(DepartmentDashboard, String, String)> = department_dashboards::table
            .inner_join(departments::table)
            .inner_join(dashboards::table)
            .order(department_dashboards::id.desc())
            .select((
                DepartmentDashboard::as_select(),
                departments::name,
                dashboards::name,
            ))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let grants = rows
            .into_iter()
            .map(|(grant, department_name, dashboard_name)| GrantDetails {
                grant,
                department_name,
                dashboard_name,
            })
            .collect();

        Ok(grants)
    }

    async fn list_department_groupings(&mut self) -> PgResult<Vec<DepartmentGrouping>> {
        use schema::{dashboards, department_dashboards, departments};

        let all_departments = departments::table
            .order(departments::name.asc())
            .select(Department::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        let granted: Vec<(i32, Dashboard)> = dashboards::table
            .inner_join(department_dashboards::table)
            .order(dashboards::name.asc())
            .select((department_dashboards::department_id, Dashboard::as_select()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let mut by_department: HashMap<i32, Vec<Dashboard>> = HashMap::new();
        for (department_id, dashboard) in granted {
            by_department.entry(department_id).or_default().push(dashboard);
        }

        let groupings: Vec<DepartmentGrouping> = all_departments
            .into_iter()
            .map(|department| {
                let dashboards = by_department.remove(&department.id).unwrap_or_default();
                (department, dashboards)
            })
            .collect();

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            departments = groupings.len(),
            "department groupings loaded"
        );

        Ok(groupings)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::model::{NewDashboard, NewDepartment};
    use crate::query::{DashboardRepository, DepartmentRepository};
    use crate::query::test::migrated_client;
    use crate::types::{ConstraintViolation, GrantConstraints};

    /// Needs a disposable database at `POSTGRES_URL`.
    #[tokio::test]
    #[ignore = "requires a running PostgreSQL"]
    async fn duplicate_grant_is_rejected_and_revocation_applies() -> PgResult<()> {
        let client = migrated_client().await?;
        let mut conn = client.get_connection().await?;

        let suffix = Timestamp::now().as_nanosecond();
        let department = conn
            .create_department(NewDepartment {
                name: format!("Finance {suffix}"),
            })
            .await?;
        let dashboard = conn
            .create_dashboard(NewDashboard {
                name: format!("Revenue {suffix}"),
                report_id: "report".into(),
                workspace_id: "workspace".into(),
                core_dataset_id: "dataset".into(),
                created_by: "Admin".into(),
                ..NewDashboard::default()
            })
            .await?;

        let new_grant = NewDepartmentDashboard {
            department_id: department.id,
            dashboard_id: dashboard.id,
            granted_by: "Admin".into(),
        };
        let grant = conn.create_grant(new_grant.clone()).await?;
        assert!(conn.grant_exists(department.id, dashboard.id).await?);

        let duplicate = conn.create_grant(new_grant).await.unwrap_err();
        assert_eq!(
            duplicate.constraint_violation(),
            Some(ConstraintViolation::Grant(GrantConstraints::UniqueGrant))
        );

        assert!(conn.delete_grant(grant.id).await?);
        assert!(!conn.grant_exists(department.id, dashboard.id).await?);
        Ok(())
    }
}
