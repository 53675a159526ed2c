//! Error taxonomy for the AI provider boundary.

use thiserror::Error;

/// Failures of a provider exchange. A single analysis makes exactly one
/// completion call, so any of these aborts the exchange (the orchestrator
/// still degrades gracefully).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API key is missing, malformed, or rejected (HTTP 401).
    #[error("provider API key is missing or invalid")]
    AuthFailure,

    /// The provider throttled the request (HTTP 429).
    #[error("provider rate limit exceeded")]
    RateLimited,

    /// The provider rejected the request body (HTTP 400).
    #[error("provider rejected the request as malformed")]
    MalformedRequest,

    /// Any other non-success status.
    #[error("provider returned status {0}")]
    Api(u16),

    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("network error calling provider: {0}")]
    Network(String),

    /// The response carried no content blocks.
    #[error("provider response contained no content")]
    EmptyResponse,
}

/// Convenience result alias for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Network(err.to_string())
    }
}
