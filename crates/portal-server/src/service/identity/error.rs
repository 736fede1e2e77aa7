use std::borrow::Cow;

/// Result type for identity provider calls.
pub type IdentityProviderResult<T, E = IdentityProviderError> = Result<T, E>;

/// Failure at the identity provider boundary.
///
/// Messages carry the provider's own description so callers can surface it
/// to the user unchanged.
#[derive(Debug, thiserror::Error)]
pub enum IdentityProviderError {
    /// The client configuration is invalid.
    #[error("{0}")]
    Config(Cow<'static, str>),

    /// The authorization code could not be exchanged.
    #[error("Authentication Error: {0}")]
    CodeExchange(String),

    /// The client-credentials grant was rejected.
    #[error("Error acquiring access token: {0}")]
    ServiceToken(String),

    /// The profile could not be loaded or carried no email.
    #[error("Failed to fetch user information")]
    Profile,

    /// The call exceeded its deadline.
    #[error("Request timeout - please try again")]
    Timeout,

    /// The provider could not be reached or returned an unreadable body.
    #[error("Identity provider request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl IdentityProviderError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(message.into())
    }
}

impl From<reqwest::Error> for IdentityProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error)
        }
    }
}
