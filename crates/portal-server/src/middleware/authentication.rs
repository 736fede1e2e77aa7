//! Session gate for private route groups.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::extract::AuthState;

/// Rejects the request with 401 unless it carries a valid session.
///
/// The resolved principal is cached in the request extensions, so handlers
/// extracting [`AuthState`] again do not hit the database twice.
pub async fn require_authentication(
    AuthState(_): AuthState,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}
