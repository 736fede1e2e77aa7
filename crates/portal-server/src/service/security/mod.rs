//! Session signing keys and cookie settings.

mod session_keys;

pub use session_keys::{SessionConfig, SessionKeys};
