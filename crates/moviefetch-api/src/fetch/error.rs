//! Fetch failure taxonomy.

use crate::catalog::DecodeError;

/// Message delivered when a failure carries no usable text.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Message delivered for HTTP statuses above 400.
pub const SERVER_ERROR: &str = "Communication error with server!";

/// Why a fetch failed.
///
/// Kept structured for logging; callers of `FetchTask` only see
/// [`FetchError::message`].
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum FetchError {
    /// URL could not be parsed or has an unsupported scheme.
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Parser or scheme diagnostic.
        reason: String,
    },
    /// Connection, TLS or protocol failure.
    Transport(reqwest::Error),
    /// Connect or read phase exceeded its timeout.
    Timeout(reqwest::Error),
    /// Server answered with status >= 400.
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Message to surface.
        message: String,
    },
    /// Response body did not decode.
    Decode(DecodeError),
    /// The worker runtime could not be started.
    Worker(std::io::Error),
}

impl FetchError {
    /// Short classification label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::Transport(_) => "transport",
            Self::Timeout(_) => "timeout",
            Self::HttpStatus { .. } => "http_status",
            Self::Decode(_) => "decode",
            Self::Worker(_) => "worker",
        }
    }

    /// Message handed to the failure callback.
    #[must_use]
    pub fn message(&self) -> String {
        let message = match self {
            Self::HttpStatus { message, .. } => message.clone(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            String::from(UNKNOWN_ERROR)
        } else {
            message
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl { url, reason } => write!(f, "invalid URL `{url}`: {reason}"),
            Self::Transport(e) => write!(f, "{e}"),
            Self::Timeout(e) => write!(f, "request timed out: {e}"),
            Self::HttpStatus { status, message } => write!(f, "HTTP {status}: {message}"),
            Self::Decode(e) => write!(f, "{e}"),
            Self::Worker(e) => write!(f, "failed to start fetch worker: {e}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) | Self::Timeout(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Worker(e) => Some(e),
            Self::InvalidUrl { .. } | Self::HttpStatus { .. } => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e)
        } else {
            Self::Transport(e)
        }
    }
}

impl From<DecodeError> for FetchError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}
