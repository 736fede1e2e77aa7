//! Cookie sessions and the authenticated principal extractor.

mod auth_state;
mod session_claims;

pub use self::auth_state::AuthState;
pub use self::session_claims::{
    OAUTH_STATE_COOKIE, SESSION_COOKIE, SessionClaims, expired_session_cookie, oauth_state_cookie,
    removal_cookie, session_cookie,
};
