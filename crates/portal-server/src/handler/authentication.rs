//! Sign-in and sign-out handlers.
//!
//! Sign-in is the authorization code flow against the identity provider. The
//! `state` value sent to the provider is mirrored in a short-lived cookie and
//! must come back unchanged. A verified email that is not registered gets a
//! 403 and no session cookie.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use portal_postgres::types::LogAction;
use uuid::Uuid;

use crate::extract::{
    Json, OAUTH_STATE_COOKIE, Query, SESSION_COOKIE, SessionClaims, expired_session_cookie,
    oauth_state_cookie, removal_cookie, session_cookie,
};
use crate::handler::request::CallbackQuery;
use crate::handler::response::{Acknowledged, ErrorResponse, Success};
use crate::handler::{ErrorKind, Result};
use crate::service::{
    AuditLogWriter, IdentityProviderClient, IdentityResolver, Principal, ServiceState, SessionKeys,
};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "portal_server::handler::authentication";

/// Path the OAuth state cookie is scoped to.
const OAUTH_STATE_PATH: &str = "/api/auth";

/// Redirects the browser to the identity provider.
#[tracing::instrument(skip_all)]
async fn login(
    State(identity_provider): State<IdentityProviderClient>,
    State(session_keys): State<SessionKeys>,
    jar: CookieJar,
) -> Result<Response> {
    let state = Uuid::new_v4().simple().to_string();
    let authorize_url = identity_provider.authorize_url(&state)?;

    tracing::debug!(target: TRACING_TARGET, "Redirecting to identity provider");

    let jar = jar.add(oauth_state_cookie(state, &session_keys));
    Ok((jar, Redirect::to(authorize_url.as_str())).into_response())
}

fn login_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Sign in")
        .description("Redirects to the identity provider's authorize endpoint.")
        .response::<303, ()>()
}

/// Completes sign-in and sets the session cookie.
#[tracing::instrument(skip_all)]
async fn callback(
    State(identity_provider): State<IdentityProviderClient>,
    State(identity_resolver): State<IdentityResolver>,
    State(audit_log): State<AuditLogWriter>,
    State(session_keys): State<SessionKeys>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<Response> {
    if let Some(description) = query.provider_error() {
        tracing::warn!(
            target: TRACING_TARGET,
            error = query.error.as_deref().unwrap_or_default(),
            "Identity provider reported an error"
        );
        return Err(ErrorKind::BadRequest
            .with_message(description.to_owned())
            .with_resource("authentication"));
    }

    let Some(code) = query.code() else {
        return Err(ErrorKind::BadRequest
            .with_message("Authorization code not received")
            .with_resource("authentication"));
    };

    let expected_state = jar.get(OAUTH_STATE_COOKIE).map(|cookie| cookie.value());
    if expected_state.is_none() || expected_state != query.state.as_deref() {
        tracing::warn!(target: TRACING_TARGET, "Sign-in state mismatch");
        return Err(ErrorKind::BadRequest
            .with_message("Sign-in request expired or was not started here, please try again")
            .with_resource("authentication"));
    }

    let access_token = identity_provider.exchange_code(code).await?;
    let profile = identity_provider.fetch_profile(&access_token).await?;
    let user = identity_resolver.resolve(&profile.email).await?;
    let principal = Principal::from(user);

    let claims = SessionClaims::new(&principal, session_keys.session_ttl());
    let token = claims.encode(&session_keys)?;

    audit_log
        .record(
            principal.user_id,
            &principal.display_name,
            &principal.email,
            LogAction::Login,
        )
        .await;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = principal.user_id,
        role = %principal.role,
        session_id = %claims.jti,
        "User signed in"
    );

    let jar = jar
        .remove(removal_cookie(OAUTH_STATE_COOKIE, OAUTH_STATE_PATH))
        .add(session_cookie(token, &session_keys));

    Ok((jar, Redirect::to(session_keys.redirect_url())).into_response())
}

fn callback_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Sign-in callback")
        .description(
            "Exchanges the authorization code, resolves the verified email to a registered \
             user and sets the session cookie.",
        )
        .response::<303, ()>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Ends the session.
///
/// Only the cookie signature is checked, so sign-out never waits on the
/// database. The expired cookie is sent even when no session was presented.
#[tracing::instrument(skip_all)]
async fn logout(
    State(audit_log): State<AuditLogWriter>,
    State(session_keys): State<SessionKeys>,
    jar: CookieJar,
) -> Result<Response> {
    let claims = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| SessionClaims::decode(cookie.value(), &session_keys).ok());

    if let Some(claims) = claims
        && let Some(user_id) = claims.user_id()
    {
        audit_log
            .record(user_id, &claims.name, &claims.email, LogAction::Logout)
            .await;

        tracing::info!(
            target: TRACING_TARGET,
            user_id,
            session_id = %claims.jti,
            "User signed out"
        );
    }

    let jar = jar.add(expired_session_cookie(&session_keys));
    let body = Success::new(Acknowledged::default()).with_message("Logged out successfully");
    Ok((jar, Json(body)).into_response())
}

fn logout_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Sign out")
        .description("Records the sign-out when a session exists and clears the session cookie.")
        .response::<200, Json<Success<Acknowledged>>>()
}

/// Returns a [`Router`] with all authentication routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/api/auth/login", get_with(login, login_docs))
        .api_route("/api/auth/callback", get_with(callback, callback_docs))
        .api_route("/api/auth/logout", post_with(logout, logout_docs))
        .with_path_items(|item| item.tag("Authentication"))
}

#[cfg(test)]
mod tests {
    use axum::extract::FromRef;
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use jiff::Timestamp;
    use portal_postgres::PgClient;
    use portal_postgres::model::NewUser;
    use portal_postgres::query::UserRepository;
    use portal_postgres::types::UserRole;

    use super::*;
    use crate::handler::test::{
        connected_state, create_test_server_for, create_test_server_with_router,
        create_test_server_with_state, principal, seed, signed_session, test_state,
    };

    #[tokio::test]
    async fn login_redirects_with_state_cookie() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server.get("/api/auth/login").await;
        response.assert_status(StatusCode::SEE_OTHER);

        let location = response.header("location");
        let location = location.to_str()?;
        assert!(location.contains("/oauth2/v2.0/authorize"));
        assert!(location.contains("scope=User.Read"));

        let state_cookie = response.cookie(OAUTH_STATE_COOKIE);
        assert!(location.contains(state_cookie.value()));
        Ok(())
    }

    #[tokio::test]
    async fn provider_error_is_reported() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server
            .get("/api/auth/callback")
            .add_query_param("error", "access_denied")
            .add_query_param("error_description", "The user cancelled")
            .await;

        response.assert_status_bad_request();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "The user cancelled");
        Ok(())
    }

    #[tokio::test]
    async fn missing_code_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server.get("/api/auth/callback").await;
        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn state_mismatch_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server
            .get("/api/auth/callback")
            .add_query_param("code", "abc")
            .add_query_param("state", "forged")
            .add_cookie(Cookie::new(OAUTH_STATE_COOKIE, "expected"))
            .await;

        response.assert_status_bad_request();
        assert!(response.maybe_cookie(SESSION_COOKIE).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn logout_without_session_clears_cookie() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server.post("/api/auth/logout").await;
        response.assert_status_ok();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["success"], true);

        let cleared = response.cookie(SESSION_COOKIE);
        assert_eq!(cleared.value(), "");
        Ok(())
    }

    #[tokio::test]
    async fn logout_with_unreachable_database_clears_cookie() -> anyhow::Result<()> {
        let state = test_state()?;
        let session = signed_session(&state, &principal(UserRole::User, 2))?;
        let server = create_test_server_with_state(routes(), state)?;

        let response = server.post("/api/auth/logout").add_cookie(session).await;
        response.assert_status_ok();

        let cleared = response.cookie(SESSION_COOKIE);
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.max_age(), Some(time::Duration::ZERO));
        Ok(())
    }

    /// Needs a disposable database at `POSTGRES_URL`.
    #[tokio::test]
    #[ignore = "requires a running PostgreSQL"]
    async fn unregistered_email_gets_no_session() -> anyhow::Result<()> {
        let email = format!("guest-{}@example.com", Timestamp::now().as_nanosecond());
        let state = connected_state(&email).await?;
        let server = create_test_server_for(&state)?;

        let response = server
            .get("/api/auth/callback")
            .add_query_param("code", "abc")
            .add_query_param("state", "expected")
            .add_cookie(Cookie::new(OAUTH_STATE_COOKIE, "expected"))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert!(response.maybe_cookie(SESSION_COOKIE).is_none());
        Ok(())
    }

    /// Needs a disposable database at `POSTGRES_URL`.
    #[tokio::test]
    #[ignore = "requires a running PostgreSQL"]
    async fn registered_email_gets_a_session() -> anyhow::Result<()> {
        let email = format!("member-{}@example.com", Timestamp::now().as_nanosecond());
        let state = connected_state(&email).await?;
        let seeded = seed(&state).await?;

        let mut conn = PgClient::from_ref(&state).get_connection().await?;
        conn.create_user(NewUser {
            email: email.clone(),
            display_name: "Member".into(),
            department_id: seeded.department.id,
            role: UserRole::User,
        })
        .await?;
        drop(conn);

        let server = create_test_server_for(&state)?;
        let response = server
            .get("/api/auth/callback")
            .add_query_param("code", "abc")
            .add_query_param("state", "expected")
            .add_cookie(Cookie::new(OAUTH_STATE_COOKIE, "expected"))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        let session = response.cookie(SESSION_COOKIE);

        let response = server.get("/api/me").add_cookie(session).await;
        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["email"], email.as_str());
        Ok(())
    }
}
