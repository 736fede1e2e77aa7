//! Router composition helpers.

mod custom_routes;
mod fail_open;

pub use custom_routes::{CustomRoutes, RouterMapFn};
pub(crate) use fail_open::fail_open;
