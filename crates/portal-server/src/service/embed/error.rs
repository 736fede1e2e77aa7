/// Result type for credential issuance.
pub type EmbedResult<T, E = EmbedError> = Result<T, E>;

/// Failure of one credential issuance step.
///
/// Workspace name lookup never fails; it falls back to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmbedError {
    /// The service token could not be acquired.
    #[error("{0}")]
    UpstreamAuth(String),

    /// The report could not be resolved.
    #[error("{0}")]
    ReportLookup(String),

    /// The vendor refused to issue the embed token.
    #[error("{0}")]
    TokenIssuance(String),
}

impl EmbedError {
    /// Returns the issuance step that failed.
    pub const fn step(&self) -> &'static str {
        match self {
            Self::UpstreamAuth(_) => "service_token",
            Self::ReportLookup(_) => "report_lookup",
            Self::TokenIssuance(_) => "token_issuance",
        }
    }
}
