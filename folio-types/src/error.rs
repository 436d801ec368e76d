//! Error type shared by the client and the session.

/// Errors from a chat backend exchange.
///
/// Every variant is recoverable at the session boundary: the session answers
/// with a canned reply instead of surfacing the error.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The backend answered with a non-success HTTP status.
    #[error("chat API error: {status} {reason}")]
    Transport {
        /// HTTP status code.
        status: u16,
        /// Reason phrase, followed by the response body when it had one.
        reason: String,
    },

    /// The response body could not be read incrementally.
    #[error("response body is not readable: {0}")]
    StreamUnavailable(String),

    /// The stream completed without any usable content.
    #[error("empty response from API")]
    EmptyStream,

    /// The request never produced a response (connection refused, DNS, bad URL).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response body was not the expected JSON shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ChatError {
    /// Build a [`ChatError::Transport`] from a status code and reason.
    #[must_use]
    pub fn transport(status: u16, reason: impl Into<String>) -> Self {
        Self::Transport {
            status,
            reason: reason.into(),
        }
    }

    /// The HTTP status, if the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}
