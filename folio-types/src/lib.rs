#![deny(missing_docs)]
//! Shared types for the folio chat client.
//!
//! Provides the [`Message`] model owned by a chat session, the [`ChatError`]
//! taxonomy, the [`ChatBackend`] trait the session is generic over, and the
//! JSON shapes exchanged with the RAG chat backend.

pub mod api;
pub mod backend;
pub mod error;
pub mod stream;
pub mod types;

pub use api::*;
pub use backend::*;
pub use error::*;
pub use stream::*;
pub use types::*;
