//! Degraded reads for listing endpoints.

use portal_postgres::PgResult;

use crate::handler::Result;

/// Tracing target for degraded listings.
const TRACING_TARGET: &str = "portal_server::handler::listings";

/// Turns an unreachable database into an empty listing.
///
/// Any other failure is surfaced as usual.
pub(crate) fn fail_open<T: Default>(listing: &'static str, result: PgResult<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(error) if error.is_unavailable() => {
            tracing::warn!(
                target: TRACING_TARGET,
                listing,
                error = %error,
                "Database unavailable, returning an empty listing"
            );
            Ok(T::default())
        }
        Err(error) => Err(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use portal_postgres::PgError;
    use portal_postgres::error::TimeoutType;

    use super::*;
    use crate::handler::ErrorKind;

    #[test]
    fn unavailable_database_yields_default() {
        let result: PgResult<Vec<i32>> = Err(PgError::Timeout(TimeoutType::Wait));
        assert_eq!(fail_open("dashboards", result).unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn other_errors_are_surfaced() {
        let result: PgResult<Vec<i32>> = Err(PgError::Config("bad pool size".into()));
        let error = fail_open("dashboards", result).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }
}
