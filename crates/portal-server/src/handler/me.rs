//! Current user handler.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;

use crate::extract::{AuthState, Json};
use crate::handler::Result;
use crate::handler::response::{CurrentUser, ErrorResponse, Success};
use crate::service::ServiceState;

/// Returns the signed-in user.
#[tracing::instrument(skip_all, fields(user_id = auth_state.user_id))]
async fn me(auth_state: AuthState) -> Result<Json<Success<CurrentUser>>> {
    let current_user = CurrentUser::from(auth_state.principal());
    Ok(Json(Success::new(current_user)))
}

fn me_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Current user")
        .description("Returns the signed-in user with the capabilities of their role.")
        .response::<200, Json<Success<CurrentUser>>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with the current user route.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/api/me", get_with(me, me_docs))
        .with_path_items(|item| item.tag("Session"))
}
