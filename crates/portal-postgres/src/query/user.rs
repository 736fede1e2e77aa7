//! User repository for identity resolution and role administration.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::model::{Department, NewUser, User};
use crate::types::UserRole;
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Outcome of an atomic role update.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleChange {
    /// Role held before the update.
    pub previous_role: UserRole,
    /// User row as written.
    pub user: User,
}

impl RoleChange {
    /// Returns whether the stored role actually changed.
    #[inline]
    pub fn is_changed(&self) -> bool {
        self.previous_role != self.user.role
    }
}

/// Repository for user database operations.
pub trait UserRepository {
    /// Finds a user by exact email match.
    fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by identifier.
    fn find_user_by_id(
        &mut self,
        user_id: i32,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Provisions a new user.
    fn create_user(&mut self, user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Lists all users with their departments, newest identifier first.
    fn list_users(&mut self) -> impl Future<Output = PgResult<Vec<(User, Department)>>> + Send;

    /// Lists users of the department with the given name, newest identifier first.
    fn list_users_by_department_name(
        &mut self,
        department_name: &str,
    ) -> impl Future<Output = PgResult<Vec<(User, Department)>>> + Send;

    /// Counts all users.
    fn count_users(&mut self) -> impl Future<Output = PgResult<i64>> + Send;

    /// Changes a user's role in a single transaction.
    ///
    /// The current row is locked with `FOR UPDATE` before the write, so the
    /// returned previous role is exactly the one that was replaced. Returns
    /// `None` if the user does not exist.
    fn update_user_role(
        &mut self,
        user_id: i32,
        new_role: UserRole,
    ) -> impl Future<Output = PgResult<Option<RoleChange>>> + Send;
}

impl UserRepository for PgConnection {
    async fn find_user_by_email(&mut self, user_email: &str) -> PgResult<Option<User>> {
        use schema::users::dsl::*;

        let user = users
            .filter(email.eq(user_email))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn find_user_by_id(&mut self, user_id: i32) -> PgResult<Option<User>> {
        use schema::users::dsl::*;

        let user = users
            .filter(id.eq(user_id))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn create_user(&mut self, user: NewUser) -> PgResult<User> {
        use schema::users;

        let user = diesel::insert_into(users::table)
            .values(&user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn list_users(&mut self) -> PgResult<Vec<(User, Department)>> {
        use schema::{departments, users};

        let rows = users::table
            .inner_join(departments::table)
            .order(users::id.desc())
            .select((User::as_select(), Department::as_select()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }

    async fn list_users_by_department_name(
        &mut self,
        department_name: &str,
    ) -> PgResult<Vec<(User, Department)>> {
        use schema::{departments, users};

        let rows = users::table
            .inner_join(departments::table)
            .filter(departments::name.eq(department_name))
            .order(users::id.desc())
            .select((User::as_select(), Department::as_select()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }

    async fn count_users(&mut self) -> PgResult<i64> {
        use schema::users::dsl::*;

        let count = users
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(count)
    }

    async fn update_user_role(
        &mut self,
        user_id: i32,
        new_role: UserRole,
    ) -> PgResult<Option<RoleChange>> {
        use schema::users::dsl::*;

        let change = self
            .transaction::<_, PgError, _>(|conn| {
                async move {
                    let previous_role = users
                        .filter(id.eq(user_id))
                        .select(role)
                        .for_update()
                        .get_result::<UserRole>(conn)
                        .await
                        .optional()?;

                    let Some(previous_role) = previous_role else {
                        return Ok(None);
                    };

                    let now = jiff_diesel::Timestamp::from(jiff::Timestamp::now());
                    let user = diesel::update(users.filter(id.eq(user_id)))
                        .set((role.eq(new_role), updated_at.eq(now)))
                        .returning(User::as_returning())
                        .get_result(conn)
                        .await?;

                    Ok(Some(RoleChange {
                        previous_role,
                        user,
                    }))
                }
                .scope_boxed()
            })
            .await?;

        if let Some(change) = &change {
            tracing::debug!(
                target: TRACING_TARGET_QUERY,
                user_id,
                previous_role = %change.previous_role,
                role = %change.user.role,
                "user role updated"
            );
        }

        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::model::NewDepartment;
    use crate::query::DepartmentRepository;
    use crate::query::test::migrated_client;

    /// Needs a disposable database at `POSTGRES_URL`.
    #[tokio::test]
    #[ignore = "requires a running PostgreSQL"]
    async fn role_update_reports_previous_role() -> PgResult<()> {
        let client = migrated_client().await?;
        let mut conn = client.get_connection().await?;

        let suffix = Timestamp::now().as_nanosecond();
        let department = conn
            .create_department(NewDepartment {
                name: format!("Operations {suffix}"),
            })
            .await?;
        let user = conn
            .create_user(NewUser {
                email: format!("analyst-{suffix}@example.com"),
                display_name: "Analyst".into(),
                department_id: department.id,
                role: UserRole::User,
            })
            .await?;

        let change = conn
            .update_user_role(user.id, UserRole::Superuser)
            .await?
            .expect("user exists");
        assert_eq!(change.previous_role, UserRole::User);
        assert_eq!(change.user.role, UserRole::Superuser);

        let change = conn
            .update_user_role(user.id, UserRole::Admin)
            .await?
            .expect("user exists");
        assert_eq!(change.previous_role, UserRole::Superuser);

        let reloaded = conn.find_user_by_id(user.id).await?.expect("user exists");
        assert_eq!(reloaded.role, UserRole::Admin);
        Ok(())
    }

    /// Needs a disposable database at `POSTGRES_URL`.
    #[tokio::test]
    #[ignore = "requires a running PostgreSQL"]
    async fn role_update_of_missing_user_is_none() -> PgResult<()> {
        let client = migrated_client().await?;
        let mut conn = client.get_connection().await?;

        let change = conn.update_user_role(i32::MAX, UserRole::Admin).await?;
        assert_eq!(change, None);
        Ok(())
    }
}
