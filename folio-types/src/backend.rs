//! The chat backend seam.
//!
//! [`ChatBackend`] uses RPITIT (return-position `impl Trait` in traits) and
//! is NOT object-safe. Sessions are generic over it instead of boxing it.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::stream::TextStream;

/// Body of the backend's liveness endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Free-form status string reported by the backend (e.g. `"healthy"`).
    pub status: String,
    /// Backend version, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Something that can answer chat queries with a streamed reply.
///
/// The HTTP client implements this; tests implement it with canned streams.
pub trait ChatBackend: Send + Sync {
    /// Start a streamed reply to `message`.
    ///
    /// Fails before yielding anything if the request itself fails.
    fn stream_chat(
        &self,
        message: String,
    ) -> impl Future<Output = Result<TextStream, ChatError>> + Send;

    /// Probe the backend's liveness endpoint.
    fn health(&self) -> impl Future<Output = Result<HealthStatus, ChatError>> + Send;
}

impl<B: ChatBackend> ChatBackend for std::sync::Arc<B> {
    fn stream_chat(
        &self,
        message: String,
    ) -> impl Future<Output = Result<TextStream, ChatError>> + Send {
        (**self).stream_chat(message)
    }

    fn health(&self) -> impl Future<Output = Result<HealthStatus, ChatError>> + Send {
        (**self).health()
    }
}
