//! Request types for HTTP handlers.

mod authentications;
mod dashboards;
mod embeds;
mod grants;
mod paths;
mod users;
mod validations;

pub use authentications::*;
pub use dashboards::*;
pub use embeds::*;
pub use grants::*;
pub use paths::*;
pub use users::*;
