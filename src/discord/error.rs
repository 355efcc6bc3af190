//! Error types for the Discord client.
//!
//! [`TransportError`] covers a single HTTP round-trip. [`ApiError`] is what the
//! resource operations return: the transport failure wrapped with the name of
//! the operation, or a decode/validation failure.

use thiserror::Error;

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The host could not be reached or the connection failed mid-flight.
    Network,
    /// The API answered with a non-2xx status.
    HttpStatus,
    /// The body was not JSON of the expected shape.
    Decode,
    /// The caller supplied a missing or malformed argument.
    Validation,
    /// The operation was cancelled between requests.
    Interrupted,
}

/// Failure of one request/response round-trip.
#[derive(Debug, Error)]
pub enum TransportError {
    /// DNS, connect, TLS or body-read failure.
    #[error("error making request {method} {url}: {source}")]
    Network {
        /// Request method.
        method: String,
        /// Full request URL.
        url: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// Response status outside `200..300`.
    #[error("request failed: {}: {body}", status_line(.status, .reason))]
    HttpStatus {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase, empty when unknown.
        reason: String,
        /// Leading bytes of the response body, lossily decoded and trimmed.
        body: String,
    },
}

impl TransportError {
    /// Creates a network error.
    pub fn network(
        method: impl Into<String>,
        url: impl Into<String>,
        source: reqwest::Error,
    ) -> Self {
        Self::Network {
            method: method.into(),
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(status: u16, reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    /// Status code for [`TransportError::HttpStatus`].
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Network { .. } => None,
        }
    }
}

/// `403 Forbidden`, or just `599` when the code has no reason phrase.
fn status_line(status: impl std::fmt::Display, reason: &str) -> String {
    if reason.is_empty() {
        status.to_string()
    } else {
        format!("{status} {reason}")
    }
}

/// Errors returned by [`crate::DiscordClient`] operations and pagination.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request itself failed.
    #[error("error {operation}: {source}")]
    Transport {
        /// What the client was doing, e.g. "fetching relationships".
        operation: &'static str,
        /// The underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// The response body did not parse into the expected shape.
    #[error("error {operation}: error parsing JSON response: {source}")]
    Decode {
        /// What the client was doing.
        operation: &'static str,
        /// The JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A message in a history page had no string `id` to continue from.
    #[error("message without a string id in channel {channel_id}; cannot continue paging")]
    MissingMessageId {
        /// Channel being paged.
        channel_id: String,
    },

    /// Missing or malformed caller input.
    #[error("{0}")]
    Validation(String),

    /// The caller asked to stop.
    #[error("interrupted before the operation completed")]
    Interrupted,

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl ApiError {
    /// Wraps a transport failure with the operation name.
    pub fn transport(operation: &'static str, source: TransportError) -> Self {
        Self::Transport { operation, source }
    }

    /// Wraps a JSON failure with the operation name.
    pub fn decode(operation: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { operation, source }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport {
                source: TransportError::Network { .. },
                ..
            }
            | Self::ClientBuild(_) => ErrorKind::Network,
            Self::Transport {
                source: TransportError::HttpStatus { .. },
                ..
            } => ErrorKind::HttpStatus,
            Self::Decode { .. } | Self::MissingMessageId { .. } => ErrorKind::Decode,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Interrupted => ErrorKind::Interrupted,
        }
    }

    /// HTTP status when the API rejected the request.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { source, .. } => source.status(),
            _ => None,
        }
    }
}
