#![deny(missing_docs)]
//! HTTP client for the portfolio RAG chat backend.
//!
//! [`RagApi`] sends a query to `POST /api/v1/chat/stream` and exposes the
//! reply as a [`ChatStream`] of text increments decoded from the
//! `text/event-stream` body. It also covers the non-streamed chat endpoint,
//! the `/health` probe, and session management.
//!
//! # Usage
//!
//! ```no_run
//! use folio_client::{ClientConfig, RagApi};
//! use futures::StreamExt;
//!
//! # async fn run() -> Result<(), folio_types::ChatError> {
//! let api = RagApi::from_config(&ClientConfig::from_env());
//! let mut reply = api.stream_chat("What is RAG?").await?;
//! while let Some(chunk) = reply.next().await {
//!     print!("{}", chunk?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! - Non-success status: [`ChatError::Transport`](folio_types::ChatError::Transport)
//! - Body read failure mid-stream: [`ChatError::StreamUnavailable`](folio_types::ChatError::StreamUnavailable)
//! - No response at all: [`ChatError::Network`](folio_types::ChatError::Network)
//! - Undecodable JSON: [`ChatError::InvalidResponse`](folio_types::ChatError::InvalidResponse)

pub mod client;
pub mod config;
pub(crate) mod error;
pub mod sessions;
pub mod streaming;

pub use client::RagApi;
pub use config::ClientConfig;
pub use streaming::ChatStream;

// Re-export folio-types for convenience
pub use folio_types::{ChatBackend, ChatError, HealthStatus, TextStream};
