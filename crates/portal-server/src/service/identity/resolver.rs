use portal_postgres::model::User;
use portal_postgres::query::UserRepository;
use portal_postgres::{PgClient, PgError};

use crate::utility::tracing_targets::IDENTITY_PROVIDER as TRACING_TARGET;

/// Failure to map a verified email to a registered user.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No account is registered for the email.
    #[error("Email {email} is not registered in the system.")]
    NotFound { email: String },

    /// The user table could not be read.
    #[error(transparent)]
    Database(#[from] PgError),
}

/// Maps an email verified by the identity provider to a registered user.
///
/// Accounts are never provisioned here; an unknown email is rejected.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    pg_client: PgClient,
}

impl IdentityResolver {
    /// Creates a resolver over the given database client.
    pub fn new(pg_client: PgClient) -> Self {
        Self { pg_client }
    }

    /// Looks up the user by exact email match.
    pub async fn resolve(&self, email: &str) -> Result<User, ResolveError> {
        let mut conn = self.pg_client.get_connection().await?;
        let user = conn.find_user_by_email(email).await?;

        match user {
            Some(user) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    user_id = user.id,
                    role = %user.role,
                    "Verified email resolved to user"
                );
                Ok(user)
            }
            None => {
                tracing::info!(
                    target: TRACING_TARGET,
                    "Verified email is not registered"
                );
                Err(ResolveError::NotFound {
                    email: email.to_owned(),
                })
            }
        }
    }
}
