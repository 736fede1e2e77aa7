//! Identity provider boundary and identity resolution.
//!
//! The [`IdentityProviderClient`] talks to the enterprise identity provider
//! for both the end-user authorization-code flow and the service-level
//! client-credentials flow. The [`IdentityResolver`] maps a verified email to
//! a registered user.

mod client;
mod config;
mod error;
mod resolver;

pub use client::{AccessToken, IdentityProfile, IdentityProviderClient};
pub use config::{ClientCredentials, IdentityProviderConfig};
pub use error::{IdentityProviderError, IdentityProviderResult};
pub use resolver::{IdentityResolver, ResolveError};
