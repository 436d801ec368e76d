//! Internal error helpers for mapping HTTP/reqwest errors to [`ChatError`].

use folio_types::ChatError;

/// Map a non-success HTTP status (and its body, if any) to [`ChatError::Transport`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ChatError {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    let body = body.trim();
    if body.is_empty() {
        ChatError::transport(status.as_u16(), reason)
    } else {
        ChatError::transport(status.as_u16(), format!("{reason} - {body}"))
    }
}

/// Map a [`reqwest::Error`] raised while sending a request.
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ChatError {
    if err.is_decode() {
        ChatError::InvalidResponse(err.to_string())
    } else {
        ChatError::Network(Box::new(err))
    }
}

/// Map a [`reqwest::Error`] raised while reading a streamed body.
pub(crate) fn map_body_error(err: reqwest::Error) -> ChatError {
    ChatError::StreamUnavailable(err.to_string())
}
