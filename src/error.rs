// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the Tursas client
//!
//! One taxonomy for both the blocking and the async call path. HTTP error
//! status codes from the target server are not errors here; they arrive as
//! normal responses.

use thiserror::Error;

/// Result type alias for Tursas operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Tursas client
#[derive(Error, Debug)]
pub enum Error {
    /// Caller misuse detected before any network attempt
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The relay did not deliver a response within the configured timeout
    #[error("request timed out after {timeout_ms}ms: {url}")]
    Timeout { url: String, timeout_ms: u64 },

    /// Relay unreachable, connection dropped, or malformed relay envelope
    #[error("relay transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded as requested
    #[error("decode error: {0}")]
    Decode(String),

    /// The session is not open (never opened, or already closed)
    #[error("session is closed")]
    SessionClosed,
}

impl Error {
    /// Create an invalid-request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Error::InvalidRequest(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(url: impl Into<String>, timeout_ms: u64) -> Self {
        Error::Timeout {
            url: url.into(),
            timeout_ms,
        }
    }

    /// Map a reqwest failure on the loopback call to the taxonomy
    pub(crate) fn from_loopback(err: reqwest::Error, url: &str, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Error::timeout(url, timeout_ms)
        } else {
            Error::Transport(err.to_string())
        }
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Check if this error was raised before any network attempt
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Error::InvalidRequest(_) | Error::SessionClosed)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::InvalidRequest(format!("malformed URL: {}", e))
    }
}
