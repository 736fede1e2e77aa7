//! Access policy engine.
//!
//! Roles map to an explicit [`PermissionSet`] once per request, and every
//! dashboard decision is a pure function of the [`Principal`], the dashboard
//! and whether the principal's department holds a grant for it.

mod access_policy;
mod permission;
mod principal;

pub use access_policy::{AccessDecision, AccessPolicy};
pub use permission::{Permission, PermissionSet, RolePermissions};
pub use principal::Principal;
