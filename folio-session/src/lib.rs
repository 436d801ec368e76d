#![deny(missing_docs)]
//! Chat session for the portfolio RAG chat widget.
//!
//! A [`ChatSession`] owns the transcript and drives one query at a time
//! against any [`ChatBackend`](folio_types::ChatBackend). When the backend is
//! unreachable, errors mid-stream, or replies with nothing, the session
//! answers from a keyword table of canned responses instead, so the visitor
//! always gets exactly one assistant message per query.
//!
//! [`HealthMonitor`] polls the backend in the background and publishes an
//! [`ApiStatus`] for display.
//!
//! ```no_run
//! use folio_session::{ChatSession, SessionConfig};
//! # async fn run<B: folio_types::ChatBackend>(backend: B) {
//! let mut session = ChatSession::with_config(backend, SessionConfig::demo());
//! if let Some(outcome) = session.send("Tell me about the architecture").await {
//!     println!("{outcome:?}: {}", session.messages().last().map_or("", |m| &m.content));
//! }
//! # }
//! ```

pub mod health;
pub mod mock;
pub mod session;

pub use health::{ApiStatus, HEALTH_POLL_INTERVAL, HealthMonitor};
pub use mock::{DEFAULT_RESPONSE, GREETING, MOCK_RESPONSES, MockResponder, mock_response};
pub use session::{
    ChatSession, DEFAULT_FALLBACK_DELAY, PendingReply, ReplyOutcome, SessionConfig, SessionEvent,
    SessionState,
};
