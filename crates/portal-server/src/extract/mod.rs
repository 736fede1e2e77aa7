//! Request extractors with portal-specific rejections.
//!
//! Every extractor rejects with the handler [`Error`] so failures render as
//! the same JSON error body as handler errors.
//!
//! - [`AuthState`] resolves the session cookie into a [`Principal`].
//! - [`PgPool`] checks a connection out of the pool.
//! - [`Json`], [`ValidateJson`], [`Path`] and [`Query`] wrap the axum
//!   extractors with readable rejection messages.
//!
//! [`Error`]: crate::handler::Error
//! [`Principal`]: crate::service::Principal

pub mod auth;
mod pg_connection;
pub mod reject;

pub use crate::extract::auth::{
    AuthState, OAUTH_STATE_COOKIE, SESSION_COOKIE, SessionClaims, expired_session_cookie,
    oauth_state_cookie, removal_cookie, session_cookie,
};
pub use crate::extract::pg_connection::PgPool;
pub use crate::extract::reject::{Json, Path, Query, ValidateJson};
