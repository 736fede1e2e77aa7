//! Signed session cookie contents.

use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, SameSite};
use jiff::Timestamp;
use jsonwebtoken::{Algorithm, Header, Validation};
use portal_postgres::types::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::handler::{ErrorKind, Result};
use crate::service::{Principal, SessionKeys};
use crate::utility::tracing_targets::AUTHENTICATION as TRACING_TARGET;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "portal_session";

/// Name of the cookie that mirrors the OAuth `state` parameter.
pub const OAUTH_STATE_COOKIE: &str = "portal_oauth_state";

/// Issuer written into and required from every session token.
const SESSION_ISSUER: &str = "portal";

/// Lifetime of the OAuth state cookie.
const OAUTH_STATE_TTL: Duration = Duration::from_secs(10 * 60);

/// Claims carried by the session cookie.
///
/// Role and department are re-read from the database on every request. The
/// copies signed in here only stand in while the database is unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Issuer.
    pub iss: String,
    /// User identifier.
    pub sub: String,
    /// Email verified by the identity provider at login.
    pub email: String,
    /// Display name at login.
    pub name: String,
    /// Role at login.
    pub role: UserRole,
    /// Department at login.
    pub department_id: i32,
    /// Issued at, seconds since the epoch.
    pub iat: i64,
    /// Expires at, seconds since the epoch.
    pub exp: i64,
    /// Unique session identifier.
    pub jti: Uuid,
}

impl SessionClaims {
    /// Creates claims for a freshly resolved principal.
    pub fn new(principal: &Principal, ttl: Duration) -> Self {
        let issued_at = Timestamp::now().as_second();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

        Self {
            iss: SESSION_ISSUER.to_owned(),
            sub: principal.user_id.to_string(),
            email: principal.email.clone(),
            name: principal.display_name.clone(),
            role: principal.role,
            department_id: principal.department_id,
            iat: issued_at,
            exp: issued_at.saturating_add(ttl),
            jti: Uuid::new_v4(),
        }
    }

    /// Returns the user identifier, if the subject is well formed.
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }

    /// Rebuilds the principal as it was at login.
    pub fn principal(&self) -> Option<Principal> {
        let user_id = self.user_id()?;
        Some(Principal::new(
            user_id,
            &self.email,
            &self.name,
            self.department_id,
            self.role,
        ))
    }

    /// Signs the claims.
    pub fn encode(&self, keys: &SessionKeys) -> Result<String> {
        let header = Header::new(Algorithm::HS256);
        jsonwebtoken::encode(&header, self, keys.encoding_key()).map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "Failed to sign session token");
            ErrorKind::InternalServerError
                .with_message("Failed to create session")
                .with_context(e.to_string())
        })
    }

    /// Verifies the signature, issuer and expiry of a session token.
    pub fn decode(token: &str, keys: &SessionKeys) -> Result<Self> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[SESSION_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<Self>(token, keys.decoding_key(), &validation)
            .map_err(|e| {
                tracing::debug!(target: TRACING_TARGET, error = %e, "Session token rejected");
                ErrorKind::MalformedSession.with_context(e.to_string())
            })?;

        Ok(data.claims)
    }
}

/// Builds the session cookie holding a signed token.
pub fn session_cookie(token: String, keys: &SessionKeys) -> Cookie<'static> {
    let max_age = i64::try_from(keys.session_ttl().as_secs()).unwrap_or(i64::MAX);

    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(keys.cookie_secure())
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Builds the short-lived cookie that mirrors the OAuth `state` value.
///
/// `SameSite=Lax` lets the cookie ride along on the identity provider's
/// top-level redirect back to the callback.
pub fn oauth_state_cookie(state: String, keys: &SessionKeys) -> Cookie<'static> {
    let max_age = i64::try_from(OAUTH_STATE_TTL.as_secs()).unwrap_or(i64::MAX);

    Cookie::build((OAUTH_STATE_COOKIE, state))
        .path("/api/auth")
        .http_only(true)
        .secure(keys.cookie_secure())
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Builds an already expired session cookie.
///
/// Sent on every sign-out, whether or not the request carried a session.
pub fn expired_session_cookie(keys: &SessionKeys) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(keys.cookie_secure())
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}

/// Builds a cookie that, when removed from a jar, clears `name` at `path`.
pub fn removal_cookie(name: &'static str, path: &'static str) -> Cookie<'static> {
    Cookie::build(name).path(path).build()
}
