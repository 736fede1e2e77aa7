//! Extension points for embedding the portal router in a larger application.

use aide::axum::ApiRouter;

use crate::service::ServiceState;

/// Function that transforms an [`ApiRouter`].
pub type RouterMapFn = fn(ApiRouter<ServiceState>) -> ApiRouter<ServiceState>;

/// Additional routes merged into the portal router.
///
/// Private routes sit behind the session check, public ones do not.
///
/// ```rust
/// use portal_server::handler::CustomRoutes;
///
/// let custom = CustomRoutes::new();
/// assert!(custom.is_empty());
/// ```
#[derive(Default, Clone)]
pub struct CustomRoutes {
    /// Routes that require a signed-in user.
    pub private_routes: Option<ApiRouter<ServiceState>>,
    /// Routes open to everyone.
    pub public_routes: Option<ApiRouter<ServiceState>>,
    /// Applied to all private routes before the session check is layered on.
    pub private_before_middleware: Option<RouterMapFn>,
    /// Applied to all public routes.
    pub public_before_middleware: Option<RouterMapFn>,
}

impl CustomRoutes {
    /// Creates an empty set of custom routes.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the private routes.
    pub fn with_private_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.private_routes = Some(routes);
        self
    }

    /// Sets the public routes.
    pub fn with_public_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.public_routes = Some(routes);
        self
    }

    /// Merges more private routes into the existing ones.
    pub fn add_private_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.private_routes = match self.private_routes {
            Some(existing) => Some(existing.merge(routes)),
            None => Some(routes),
        };
        self
    }

    /// Merges more public routes into the existing ones.
    pub fn add_public_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.public_routes = match self.public_routes {
            Some(existing) => Some(existing.merge(routes)),
            None => Some(routes),
        };
        self
    }

    /// Sets a function mapping private routes before the session check.
    pub fn with_private_before_middleware(mut self, f: RouterMapFn) -> Self {
        self.private_before_middleware = Some(f);
        self
    }

    /// Sets a function mapping public routes.
    pub fn with_public_before_middleware(mut self, f: RouterMapFn) -> Self {
        self.public_before_middleware = Some(f);
        self
    }

    /// Returns true if no custom routes are configured.
    pub fn is_empty(&self) -> bool {
        self.private_routes.is_none() && self.public_routes.is_none()
    }

    pub(crate) fn map_private(&self, router: ApiRouter<ServiceState>) -> ApiRouter<ServiceState> {
        match self.private_before_middleware {
            Some(f) => f(router),
            None => router,
        }
    }

    pub(crate) fn map_public(&self, router: ApiRouter<ServiceState>) -> ApiRouter<ServiceState> {
        match self.public_before_middleware {
            Some(f) => f(router),
            None => router,
        }
    }
}

impl std::fmt::Debug for CustomRoutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRoutes")
            .field("has_private_routes", &self.private_routes.is_some())
            .field("has_public_routes", &self.public_routes.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_are_merged() {
        let custom = CustomRoutes::new()
            .add_private_routes(ApiRouter::new())
            .add_private_routes(ApiRouter::new());

        assert!(!custom.is_empty());
        assert!(custom.public_routes.is_none());
    }
}
