//! Append-only audit log repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{NewUserLog, UserLog};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for the audit log.
///
/// There are deliberately no update or delete operations.
pub trait UserLogRepository {
    /// Appends a new audit entry.
    fn append_user_log(
        &mut self,
        entry: NewUserLog,
    ) -> impl Future<Output = PgResult<UserLog>> + Send;

    /// Lists all audit entries, newest first.
    fn list_user_logs(&mut self) -> impl Future<Output = PgResult<Vec<UserLog>>> + Send;
}

impl UserLogRepository for PgConnection {
    async fn append_user_log(&mut self, entry: NewUserLog) -> PgResult<UserLog> {
        use schema::user_logs;

        let entry = diesel::insert_into(user_logs::table)
            .values(&entry)
            .returning(UserLog::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(entry)
    }

    async fn list_user_logs(&mut self) -> PgResult<Vec<UserLog>> {
        use schema::user_logs::dsl::*;

        let rows = user_logs
            .order((created_at.desc(), id.desc()))
            .select(UserLog::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }
}
