//! Embedded schema migrations.

use std::ops::DerefMut;
use std::time::{Duration, Instant};

use diesel::migration::MigrationSource;
use diesel::pg::Pg;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::PoolableConnection;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Applied and pending migration versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Versions recorded in `__diesel_schema_migrations`, oldest first.
    pub applied_versions: Vec<String>,
    /// Embedded versions not yet applied, oldest first.
    pub pending_versions: Vec<String>,
}

impl MigrationStatus {
    /// Returns whether every embedded migration has been applied.
    #[inline]
    pub fn is_up_to_date(&self) -> bool {
        self.pending_versions.is_empty()
    }

    /// Returns the number of pending migrations.
    #[inline]
    pub fn pending_migrations(&self) -> usize {
        self.pending_versions.len()
    }

    /// Returns the most recently applied version.
    pub fn last_applied_version(&self) -> Option<&str> {
        self.applied_versions.last().map(String::as_str)
    }
}

/// Outcome of [`run_pending_migrations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Wall time spent, including the status check.
    pub duration: Duration,
    /// Versions applied by this run.
    pub applied_versions: Vec<String>,
}

impl MigrationResult {
    pub(crate) fn success(duration: Duration, applied_versions: Vec<String>) -> Self {
        Self {
            duration,
            applied_versions,
        }
    }

    /// Returns the number of migrations applied by this run.
    #[inline]
    pub fn applied_count(&self) -> usize {
        self.applied_versions.len()
    }
}

/// Compares the embedded migrations against the versions recorded in the database.
#[tracing::instrument(skip(conn), target = TRACING_TARGET_MIGRATION)]
pub async fn get_migration_status(conn: &mut AsyncPgConnection) -> PgResult<MigrationStatus> {
    let applied_versions = get_applied_migrations(conn).await?;

    let embedded = MigrationSource::<Pg>::migrations(&MIGRATIONS).map_err(PgError::Migration)?;
    let pending_versions = embedded
        .iter()
        .map(|migration| migration.name().version().to_string())
        .filter(|version| !applied_versions.contains(version))
        .collect();

    let status = MigrationStatus {
        applied_versions,
        pending_versions,
    };

    tracing::debug!(
        target: TRACING_TARGET_MIGRATION,
        applied = status.applied_versions.len(),
        pending = status.pending_migrations(),
        "migration status retrieved"
    );

    Ok(status)
}

#[derive(diesel::QueryableByName)]
struct TableExists {
    #[diesel(sql_type = diesel::sql_types::Bool)]
    exists: bool,
}

#[derive(diesel::QueryableByName)]
struct MigrationVersion {
    #[diesel(sql_type = diesel::sql_types::Text)]
    version: String,
}

/// Reads applied versions; a fresh database has none.
async fn get_applied_migrations(conn: &mut AsyncPgConnection) -> PgResult<Vec<String>> {
    let table = diesel::sql_query(
        "SELECT EXISTS (SELECT FROM information_schema.tables \
         WHERE table_name = '__diesel_schema_migrations') AS exists",
    )
    .get_result::<TableExists>(conn)
    .await
    .map_err(PgError::from)?;

    if !table.exists {
        return Ok(Vec::new());
    }

    let versions = diesel::sql_query("SELECT version FROM __diesel_schema_migrations ORDER BY version")
        .get_results::<MigrationVersion>(conn)
        .await
        .map_err(PgError::from)?
        .into_iter()
        .map(|row| row.version)
        .collect();

    Ok(versions)
}

/// Applies every pending embedded migration.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    let start_time = Instant::now();
    let mut conn = pg.get_pooled_connection().await?;
    let initial_status = get_migration_status(&mut conn).await?;

    if initial_status.is_up_to_date() {
        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            last_applied = ?initial_status.last_applied_version(),
            "database schema is up to date"
        );
        return Ok(MigrationResult::success(start_time.elapsed(), Vec::new()));
    }

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        pending = initial_status.pending_migrations(),
        "applying pending migrations"
    );

    let mut conn: AsyncConnectionWrapper<_> = conn.into();
    let results = spawn_blocking(move || {
        let versions = conn
            .run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.into_iter().map(|v| v.to_string()).collect::<Vec<_>>());
        (versions, conn)
    })
    .await;

    let duration = start_time.elapsed();
    let (versions, mut conn) = results.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            error = %err,
            "migration task panicked"
        );
        PgError::Migration(err.into())
    })?;

    let versions = versions.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            error = %err,
            "database migration failed"
        );
        PgError::Migration(err)
    })?;

    if conn.deref_mut().is_broken() {
        tracing::warn!(
            target: TRACING_TARGET_MIGRATION,
            "connection is broken after migrations"
        );
    }

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?duration,
        applied = versions.len(),
        "database migrations applied"
    );

    Ok(MigrationResult::success(duration, versions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_migrations_are_discoverable() {
        let embedded = MigrationSource::<Pg>::migrations(&MIGRATIONS).expect("embedded migrations");
        assert!(!embedded.is_empty());
    }

    #[test]
    fn status_reports_pending() {
        let status = MigrationStatus {
            applied_versions: vec!["20250101000000".to_owned()],
            pending_versions: vec!["20250115000000".to_owned()],
        };
        assert!(!status.is_up_to_date());
        assert_eq!(status.pending_migrations(), 1);
        assert_eq!(status.last_applied_version(), Some("20250101000000"));
    }
}
