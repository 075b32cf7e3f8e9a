use std::time::Duration;
use thiserror::Error;

/// Errors raised at the upstream API boundary.
///
/// Status-specific variants carry the exact user-facing explanation the
/// presentation layer shows; callers are expected to display
/// `to_string()` verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401.
    #[error("Invalid API key. Please check your API key.")]
    Unauthorized,

    /// HTTP 403.
    #[error("Access denied. Please ensure your plan includes API access.")]
    PlanRestricted,

    /// HTTP 422.
    #[error("Invalid search parameters. Please check your search criteria and try again.")]
    InvalidParameters,

    /// HTTP 429.
    #[error("Rate limit exceeded. Please wait a moment before trying again.")]
    RateLimited,

    /// Any other non-2xx status, carrying the upstream's own message
    /// when its error body provided one.
    #[error("{message}")]
    Upstream {
        /// The HTTP status code.
        status: u16,
        /// The message shown to the user.
        message: String,
    },

    /// Transport-level failure before a response arrived.
    #[error("Unable to connect to the upstream API. Please check your internet connection.")]
    Network(#[source] reqwest::Error),

    /// The request exceeded the client timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The response body was not the JSON we expected.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Client construction or other local failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
