//! Typed failures for the transport, parse, and fetch layers.
//!
//! These are deliberately `Clone`: the resolver encodes them into
//! per-artifact results that fan out to multiple waiters.

use thiserror::Error;

/// A transport-level failure, classified for the resolver's repository loop.
///
/// 404 is not an error at this layer; transport implementations return
/// `Ok(None)` for it.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Timeout, DNS failure, or refused connection.
    #[error("connection failed for {url}: {message}")]
    Connectivity { url: String, message: String },

    /// Non-404 HTTP failure after retries.
    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },

    /// Request construction or body-read failure that is not connectivity.
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl TransportError {
    /// Whether this failure means the repository host is unreachable,
    /// as opposed to the document being missing or broken.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }
}

/// Malformed XML in a metadata or descriptor document.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure of a single fetch-and-parse operation.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed document at {url}: {message}")]
    Parse { url: String, message: String },
}

impl FetchError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Transport(t) if t.is_connectivity())
    }

    pub fn parse(url: &str, err: ParseError) -> Self {
        Self::Parse {
            url: url.to_string(),
            message: err.message,
        }
    }
}
