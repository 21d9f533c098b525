//! Remote quote fetch contracts.
//!
//! # Responsibility
//! - Define the HTTP transport seam used to reach the quote API.
//! - Classify fetch failures into user-facing categories.
//!
//! # Invariants
//! - Transport implementations return non-2xx responses as `Ok`; status
//!   handling belongs to the caller.
//! - A failed fetch never leaves a partially written note behind.

use crate::vault::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod http;
mod response;

pub use http::ReqwestTransport;
pub use response::{parse_quote_response, QuoteResponseError};

/// Raw HTTP response as seen by quote parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection, DNS or timeout failure; usually means offline.
    Network,
    /// Any other client-side failure (bad URL, body decode, client setup).
    Other,
}

/// Transport-level failure before a response was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Network,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Other,
            message: message.into(),
        }
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TransportErrorKind::Network => write!(f, "network error: {}", self.message),
            TransportErrorKind::Other => write!(f, "{}", self.message),
        }
    }
}

impl Error for TransportError {}

/// HTTP GET seam for the quote API.
pub trait QuoteTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Fetch-and-save failures.
#[derive(Debug)]
pub enum FetchError {
    Transport(TransportError),
    /// API answered with a non-2xx status.
    Status(u16),
    /// Body is not JSON; carries the raw text.
    InvalidJson { raw: String },
    /// JSON lacks `text`/`author`/identifier; carries pretty-printed JSON.
    UnexpectedShape { pretty: String },
    Store(StoreError),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "{err}"),
            Self::Status(code) => write!(f, "quote api returned status {code}"),
            Self::InvalidJson { .. } => write!(f, "quote api returned invalid json"),
            Self::UnexpectedShape { .. } => write!(f, "quote api returned unexpected json"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransportError> for FetchError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

impl From<StoreError> for FetchError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<QuoteResponseError> for FetchError {
    fn from(value: QuoteResponseError) -> Self {
        match value {
            QuoteResponseError::InvalidJson { raw } => Self::InvalidJson { raw },
            QuoteResponseError::UnexpectedShape { pretty } => Self::UnexpectedShape { pretty },
        }
    }
}

impl FetchError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(err) if err.kind == TransportErrorKind::Network => "network",
            Self::Transport(_) => "transport",
            Self::Status(_) => "http_status",
            Self::InvalidJson { .. } => "invalid_json",
            Self::UnexpectedShape { .. } => "unexpected_shape",
            Self::Store(_) => "store",
        }
    }
}
