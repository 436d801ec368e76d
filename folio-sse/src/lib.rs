#![deny(missing_docs)]
//! Incremental decoder for `text/event-stream` chat replies.
//!
//! The backend streams a reply as lines of the form
//!
//! ```text
//! data: Hel
//!
//! data: lo!
//!
//! data: [DONE]
//! ```
//!
//! [`SseDecoder`] turns arbitrarily segmented input into ordered
//! [`StreamFrame`]s, and [`decode_stream`] drives it over an async byte
//! stream such as `reqwest::Response::bytes_stream()`.

pub mod decoder;
pub mod stream;

pub use decoder::{DATA_PREFIX, DONE_SENTINEL, SseDecoder, StreamFrame};
pub use stream::decode_stream;
