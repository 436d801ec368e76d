#![deny(missing_docs)]
//! # folio: umbrella crate
//!
//! Single import surface for the portfolio RAG chat client. Re-exports the
//! member crates behind feature flags, plus a `prelude` for the common case
//! of pointing a [`ChatSession`](prelude::ChatSession) at a
//! [`RagApi`](prelude::RagApi).

pub use folio_types as types;

#[cfg(feature = "client")]
pub use folio_client as client;
#[cfg(feature = "session")]
pub use folio_session as session;
#[cfg(feature = "sse")]
pub use folio_sse as sse;

/// Happy-path imports.
pub mod prelude {
    pub use folio_types::{
        ChatBackend, ChatError, HealthStatus, Message, Role, TextStream,
    };

    #[cfg(feature = "client")]
    pub use folio_client::{ChatStream, ClientConfig, RagApi};

    #[cfg(feature = "session")]
    pub use folio_session::{
        ApiStatus, ChatSession, HEALTH_POLL_INTERVAL, HealthMonitor, MockResponder, ReplyOutcome,
        SessionConfig, SessionEvent, SessionState, mock_response,
    };

    #[cfg(feature = "sse")]
    pub use folio_sse::{SseDecoder, StreamFrame};
}
