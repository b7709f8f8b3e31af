//! Error types for the core library.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing or invalid configuration, such as an absent API token.
    #[error("configuration error: {0}")]
    Config(String),

    /// A malformed or incomplete command request.
    #[error("invalid input: {0}")]
    Input(String),

    /// A Slack API call failed.
    #[error("failed to {operation}: {source}")]
    Fetch {
        /// The operation that was being performed.
        operation: &'static str,
        /// The underlying API failure.
        #[source]
        source: ApiError,
    },

    /// A message timestamp could not be decoded.
    #[error("failed to parse timestamp {value:?}: {source}")]
    Parse {
        /// The raw timestamp text.
        value: String,
        /// Why decoding failed.
        #[source]
        source: TimestampError,
    },

    /// Writing command output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`CoreError::Config`].
    Config,
    /// See [`CoreError::Input`].
    Input,
    /// See [`CoreError::Fetch`].
    Fetch,
    /// See [`CoreError::Parse`].
    Parse,
    /// See [`CoreError::Io`].
    Io,
}

impl CoreError {
    /// Wrap an API failure with the operation it interrupted.
    #[must_use]
    pub const fn fetch(operation: &'static str, source: ApiError) -> Self {
        Self::Fetch { operation, source }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Input(_) => ErrorKind::Input,
            Self::Fetch { .. } => ErrorKind::Fetch,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Failure talking to the Slack Web API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP request could not be completed.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },

    /// Slack answered with `ok: false`.
    #[error("slack error: {0}")]
    Slack(String),

    /// The response body did not have the expected shape.
    #[error("decoding response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Why a Slack timestamp could not be decoded.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimestampError {
    /// The text is not of the form `<digits>[.<digits>]`.
    #[error("not a decimal number")]
    NotDecimal,

    /// The value does not fit in a representable instant.
    #[error("out of range")]
    OutOfRange,
}

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;
