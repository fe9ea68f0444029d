//! Unified error types for mcp-spider.
//!
//! Every tool failure is reported to the MCP caller through one of these
//! variants, each with a stable JSON-RPC error code.

use rmcp::model::{ErrorCode, ErrorData as McpError};

use crate::config::ConfigError;

/// Unified error types for the mcp-spider server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., unknown return format).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Missing or invalid configuration (e.g., no API key).
    #[error("CONFIG_ERROR: {0}")]
    Config(String),

    /// Connection, timeout or mid-body read failure.
    #[error("TRANSPORT_ERROR: {0}")]
    Transport(String),

    /// Non-success HTTP status returned by the Spider API.
    #[error("UPSTREAM_STATUS: {0}")]
    UpstreamStatus(String),

    /// Spider API rejected the credential.
    #[error("AUTH_ERROR: {0}")]
    AuthError(String),

    /// Spider API rate limited the request.
    #[error("RATE_LIMITED: {0}")]
    RateLimited(String),

    /// Account has no credits left.
    #[error("INSUFFICIENT_CREDITS: {0}")]
    InsufficientCredits(String),

    /// Response body could not be decoded.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::Config(msg) => (-32020, msg.clone()),
            Error::Transport(msg) => (-32021, msg.clone()),
            Error::UpstreamStatus(msg) => (-32022, msg.clone()),
            Error::AuthError(msg) => (-32023, msg.clone()),
            Error::RateLimited(msg) => (-32024, msg.clone()),
            Error::InsufficientCredits(msg) => (-32025, msg.clone()),
            Error::Parse(msg) => (-32026, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
