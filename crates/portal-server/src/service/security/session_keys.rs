//! Signing keys for the session cookie.
//!
//! Sessions are HS256-signed JWTs derived from a shared secret. The keys are
//! prepared once at start-up and shared through [`SessionKeys`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};

use crate::utility::tracing_targets::AUTHENTICATION as TRACING_TARGET;
use crate::{Error, Result};

/// Shortest accepted session secret, in bytes.
const MIN_SECRET_LEN: usize = 32;

/// Shortest and longest accepted session lifetime, in seconds.
const MIN_TTL_SECS: u64 = 300;
const MAX_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Session cookie configuration.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct SessionConfig {
    /// Secret used to sign session cookies (at least 32 bytes)
    #[cfg_attr(feature = "config", arg(long = "session-secret", env = "SESSION_SECRET"))]
    pub session_secret: String,

    /// Session lifetime in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "session-ttl-secs", env = "SESSION_TTL_SECS", default_value = "28800")
    )]
    pub session_ttl_secs: u64,

    /// Whether session cookies carry the `Secure` attribute
    #[cfg_attr(
        feature = "config",
        arg(
            long = "session-cookie-secure",
            env = "SESSION_COOKIE_SECURE",
            default_value = "true",
            action = clap::ArgAction::Set
        )
    )]
    pub session_cookie_secure: bool,

    /// Where the browser lands after signing in or out
    #[cfg_attr(
        feature = "config",
        arg(long = "session-redirect-url", env = "SESSION_REDIRECT_URL", default_value = "/")
    )]
    pub session_redirect_url: String,
}

impl SessionConfig {
    /// Creates a configuration with the default lifetime.
    pub fn new(session_secret: impl Into<String>) -> Self {
        Self {
            session_secret: session_secret.into(),
            session_ttl_secs: 8 * 60 * 60,
            session_cookie_secure: true,
            session_redirect_url: "/".to_owned(),
        }
    }

    /// Returns the session lifetime.
    #[inline]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Validates the secret length and the lifetime bounds.
    pub fn validate(&self) -> Result<()> {
        if self.session_secret.len() < MIN_SECRET_LEN {
            return Err(Error::config(format!(
                "Session secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        if self.session_redirect_url.trim().is_empty() {
            return Err(Error::config("Session redirect URL must not be empty"));
        }

        if !(MIN_TTL_SECS..=MAX_TTL_SECS).contains(&self.session_ttl_secs) {
            return Err(Error::config(format!(
                "Session lifetime must be between {MIN_TTL_SECS} and {MAX_TTL_SECS} seconds"
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("session_secret", &"[REDACTED]")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("session_cookie_secure", &self.session_cookie_secure)
            .field("session_redirect_url", &self.session_redirect_url)
            .finish()
    }
}

/// Keys used to sign and verify session cookies.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    session_ttl: Duration,
    cookie_secure: bool,
    redirect_url: String,
}

impl SessionKeys {
    /// Prepares the keys from a validated configuration.
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        config.validate().map_err(|_| {
            Error::auth("Session secret or lifetime is invalid, check SESSION_SECRET")
        })?;

        let secret = config.session_secret.as_bytes();
        let inner = SessionKeysInner {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            session_ttl: config.session_ttl(),
            cookie_secure: config.session_cookie_secure,
            redirect_url: config.session_redirect_url.clone(),
        };

        tracing::info!(
            target: TRACING_TARGET,
            session_ttl_secs = config.session_ttl_secs,
            "Session keys prepared",
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns the key used to verify session cookies.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns the key used to sign session cookies.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Returns how long a new session stays valid.
    #[inline]
    pub fn session_ttl(&self) -> Duration {
        self.inner.session_ttl
    }

    /// Returns whether cookies are marked `Secure`.
    #[inline]
    pub fn cookie_secure(&self) -> bool {
        self.inner.cookie_secure
    }

    /// Returns where the browser is sent after signing in.
    #[inline]
    pub fn redirect_url(&self) -> &str {
        &self.inner.redirect_url
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("session_ttl", &self.inner.session_ttl)
            .field("cookie_secure", &self.inner.cookie_secure)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_secret_is_rejected() {
        let config = SessionConfig::new("too-short");
        assert!(config.validate().is_err());
        assert!(SessionKeys::from_config(&config).is_err());
    }

    #[test]
    fn ttl_bounds_are_enforced() {
        let mut config = SessionConfig::new("s".repeat(48));
        config.session_ttl_secs = 10;
        assert!(config.validate().is_err());

        config.session_ttl_secs = 3600;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_redacts_secret() {
        let config = SessionConfig::new("a-very-long-session-secret-value-0123456789");
        let debug = format!("{config:?}");
        assert!(!debug.contains("a-very-long-session-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
