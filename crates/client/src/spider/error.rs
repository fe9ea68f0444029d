//! Spider API client error types.

use std::sync::Arc;

use spindle_core::Error;

/// Errors from the Spider API client.
///
/// Configuration, transport and upstream-status failures are kept apart so
/// tools can report each with its own code.
#[derive(Debug, thiserror::Error)]
pub enum SpiderError {
    /// No API key configured.
    #[error("missing API key: set SPIDER_API_KEY")]
    MissingApiKey,

    /// Request rejected before it was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// The account has run out of credits.
    #[error("insufficient credits")]
    InsufficientCredits,

    /// Rate limited by the Spider API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// Any other non-success HTTP status.
    #[error("HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Connection or request failure.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// The connection failed while the response body was being read.
    #[error("stream read failed: {0}")]
    Stream(Arc<reqwest::Error>),

    /// A single-document response was not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),
}

impl SpiderError {
    /// Classify a failure while reading the response body.
    pub(crate) fn from_body(err: reqwest::Error) -> Self {
        if err.is_timeout() { SpiderError::Timeout } else { SpiderError::Stream(Arc::new(err)) }
    }
}

impl From<reqwest::Error> for SpiderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { SpiderError::Timeout } else { SpiderError::Network(Arc::new(err)) }
    }
}

impl From<SpiderError> for Error {
    fn from(err: SpiderError) -> Self {
        match err {
            SpiderError::MissingApiKey => Error::Config(err.to_string()),
            SpiderError::InvalidRequest(msg) => Error::InvalidInput(msg),
            SpiderError::AuthError => Error::AuthError(err.to_string()),
            SpiderError::InsufficientCredits => Error::InsufficientCredits(err.to_string()),
            SpiderError::RateLimited => Error::RateLimited(err.to_string()),
            SpiderError::HttpError { .. } => Error::UpstreamStatus(err.to_string()),
            SpiderError::Timeout | SpiderError::Network(_) | SpiderError::Stream(_) => {
                Error::Transport(err.to_string())
            }
            SpiderError::Parse(msg) => Error::Parse(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpiderError::MissingApiKey;
        assert!(err.to_string().contains("API key"));

        let err = SpiderError::HttpError { status: 500, body: "boom".into() };
        assert_eq!(err.to_string(), "HTTP error 500: boom");
    }

    #[test]
    fn test_maps_to_tool_errors() {
        assert!(matches!(Error::from(SpiderError::MissingApiKey), Error::Config(_)));
        assert!(matches!(Error::from(SpiderError::InvalidRequest("x".into())), Error::InvalidInput(m) if m == "x"));
        assert!(matches!(Error::from(SpiderError::AuthError), Error::AuthError(_)));
        assert!(matches!(Error::from(SpiderError::InsufficientCredits), Error::InsufficientCredits(_)));
        assert!(matches!(Error::from(SpiderError::RateLimited), Error::RateLimited(_)));
        assert!(matches!(Error::from(SpiderError::Timeout), Error::Transport(_)));
        assert!(matches!(Error::from(SpiderError::Parse("bad".into())), Error::Parse(_)));

        let upstream = Error::from(SpiderError::HttpError { status: 502, body: "bad gateway".into() });
        assert!(matches!(upstream, Error::UpstreamStatus(ref m) if m.contains("502")));
    }
}
