//! Department repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{Department, NewDepartment};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for department database operations.
pub trait DepartmentRepository {
    /// Creates a new department.
    fn create_department(
        &mut self,
        department: NewDepartment,
    ) -> impl Future<Output = PgResult<Department>> + Send;

    /// Finds a department by identifier.
    fn find_department_by_id(
        &mut self,
        department_id: i32,
    ) -> impl Future<Output = PgResult<Option<Department>>> + Send;

    /// Lists all departments, newest identifier first.
    fn list_departments(&mut self) -> impl Future<Output = PgResult<Vec<Department>>> + Send;

    /// Counts all departments.
    fn count_departments(&mut self) -> impl Future<Output = PgResult<i64>> + Send;
}

impl DepartmentRepository for PgConnection {
    async fn create_department(&mut self, department: NewDepartment) -> PgResult<Department> {
        use schema::departments;

        let department = diesel::insert_into(departments::table)
            .values(&department)
            .returning(Department::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(department)
    }

    async fn find_department_by_id(&mut self, department_id: i32) -> PgResult<Option<Department>> {
        use schema::departments::dsl::*;

        let department = departments
            .filter(id.eq(department_id))
            .select(Department::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(department)
    }

    async fn list_departments(&mut self) -> PgResult<Vec<Department>> {
        use schema::departments::dsl::*;

        let rows = departments
            .order(id.desc())
            .select(Department::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }

    async fn count_departments(&mut self) -> PgResult<i64> {
        use schema::departments::dsl::*;

        let count = departments
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(count)
    }
}
