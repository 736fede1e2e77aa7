//! Role gates for the administration routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::extract::AuthState;
use crate::handler::{ErrorKind, Result};
use crate::service::Permission;

/// Rejects the request with 403 unless the principal is an admin or a
/// superuser.
///
/// Must be layered inside [`require_authentication`].
///
/// [`require_authentication`]: super::require_authentication
pub async fn require_administration(
    auth_state: AuthState,
    request: Request,
    next: Next,
) -> Result<Response> {
    auth_state.authorize(Permission::ViewAdministration)?;
    Ok(next.run(request).await)
}

/// Rejects non-safe methods with 403 unless the principal holds `permission`.
///
/// Runs before the handler's extractors, so a denied write never reads the
/// body or checks out a connection. Reads the principal cached by
/// [`require_authentication`] and must be layered inside it.
///
/// ```rust,ignore
/// router.route_layer(from_fn_with_state(Permission::ManageGrants, require_permission));
/// ```
///
/// [`require_authentication`]: super::require_authentication
pub async fn require_permission(
    State(permission): State<Permission>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if !request.method().is_safe() {
        let Some(auth_state) = request.extensions().get::<AuthState>() else {
            return Err(ErrorKind::MissingSession.into_error());
        };

        auth_state.authorize(permission)?;
    }

    Ok(next.run(request).await)
}
