//! User administration handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::middleware::from_fn_with_state;
use portal_postgres::PgClient;
use portal_postgres::query::UserRepository;
use portal_postgres::types::UserRole;

use crate::extract::{AuthState, Json, Path, PgPool, Query, ValidateJson};
use crate::handler::request::{UpdateRole, UserFilter, UserPathParams};
use crate::handler::response::{ErrorResponse, RoleUpdate, Success, UserEntry, Users};
use crate::handler::utility::fail_open;
use crate::handler::{ErrorKind, Result};
use crate::middleware::require_permission;
use crate::service::{Permission, ServiceState};

/// Tracing target for user administration.
const TRACING_TARGET: &str = "portal_server::handler::users";

/// Lists users, optionally restricted to one department.
#[tracing::instrument(skip_all, fields(department = ?filter.department))]
async fn list_users(
    State(pg_client): State<PgClient>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Success<Users>>> {
    let users = fail_open("users", async {
        let mut conn = PgPool::checkout(&pg_client).await?;
        match filter.department.as_deref() {
            Some(department) => conn.list_users_by_department_name(department).await,
            None => conn.list_users().await,
        }
    }
    .await)?;

    let response = Users {
        users: users.into_iter().map(UserEntry::from).collect(),
    };

    Ok(Json(Success::new(response)))
}

fn list_users_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List users")
        .description(
            "Returns users with their department, identifier descending. The optional \
             `department` query parameter filters by exact department name.",
        )
        .response::<200, Json<Success<Users>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

fn role_update_message(update: &RoleUpdate) -> String {
    let from = role_label(update.previous_role);
    let to = role_label(update.role);

    if update.is_self_update {
        format!("Your role has been updated successfully from {from} to {to}. Redirecting...")
    } else {
        format!("User role updated successfully from {from} to {to}")
    }
}

fn role_label(role: UserRole) -> String {
    role.to_string().to_uppercase()
}

/// Changes a user's role.
#[tracing::instrument(
    skip_all,
    fields(user_id = auth_state.user_id, target_user_id = path_params.user_id)
)]
async fn update_role(
    auth_state: AuthState,
    PgPool(mut conn): PgPool,
    Path(path_params): Path<UserPathParams>,
    ValidateJson(request): ValidateJson<UpdateRole>,
) -> Result<Json<Success<RoleUpdate>>> {
    let Some(change) = conn
        .update_user_role(path_params.user_id, request.role)
        .await?
    else {
        return Err(ErrorKind::NotFound
            .with_message("User not found")
            .with_resource("user"));
    };

    let update = RoleUpdate::new(&change, auth_state.user_id);

    tracing::info!(
        target: TRACING_TARGET,
        previous_role = %update.previous_role,
        role = %update.role,
        is_self_update = update.is_self_update,
        "User role updated"
    );

    let message = role_update_message(&update);
    Ok(Json(Success::new(update).with_message(message)))
}

fn update_role_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update user role")
        .description(
            "Changes a user's role. The change applies to that user's next request; \
             `isSelfUpdate` tells the client to reload its own session.",
        )
        .response::<200, Json<Success<RoleUpdate>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all user administration routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/api/admin/users", get_with(list_users, list_users_docs))
        .api_route(
            "/api/admin/users/{userId}/role",
            put_with(update_role, update_role_docs),
        )
        .route_layer(from_fn_with_state(Permission::ManageRoles, require_permission))
        .with_path_items(|item| item.tag("Administration"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::test::{connected_state, create_test_server_for, seed, session_for};

    fn update(previous_role: UserRole, role: UserRole, is_self_update: bool) -> RoleUpdate {
        RoleUpdate {
            user_id: 4,
            previous_role,
            role,
            is_self_update,
        }
    }

    #[test]
    fn message_names_both_roles() {
        let message = role_update_message(&update(UserRole::User, UserRole::Superuser, false));
        assert_eq!(message, "User role updated successfully from USER to SUPERUSER");
    }

    #[test]
    fn self_update_message_asks_for_reload() {
        let message = role_update_message(&update(UserRole::Admin, UserRole::User, true));
        assert_eq!(
            message,
            "Your role has been updated successfully from ADMIN to USER. Redirecting..."
        );
    }

    /// Needs a disposable database at `POSTGRES_URL`.
    #[tokio::test]
    #[ignore = "requires a running PostgreSQL"]
    async fn role_update_flags_only_the_caller() -> anyhow::Result<()> {
        let state = connected_state("unused@example.com").await?;
        let seeded = seed(&state).await?;
        let server = create_test_server_for(&state)?;
        let admin = session_for(&state, &seeded.admin)?;

        let response = server
            .put(&format!("/api/admin/users/{}/role", seeded.analyst.id))
            .add_cookie(admin.clone())
            .json(&json!({ "role": "Superuser" }))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["previousRole"], "user");
        assert_eq!(body["role"], "superuser");
        assert_eq!(body["isSelfUpdate"], false);
        assert_eq!(
            body["message"],
            "User role updated successfully from USER to SUPERUSER"
        );

        let response = server
            .put(&format!("/api/admin/users/{}/role", seeded.admin.id))
            .add_cookie(admin.clone())
            .json(&json!({ "role": "user" }))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["isSelfUpdate"], true);

        let response = server
            .put(&format!("/api/admin/users/{}/role", seeded.analyst.id))
            .add_cookie(admin)
            .json(&json!({ "role": "admin" }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        Ok(())
    }
}
