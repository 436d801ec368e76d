//! Streaming reply handle.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;

use crate::error::ChatError;

/// Handle to a streamed assistant reply.
///
/// Yields text increments in arrival order. The handle is single-pass: once
/// it ends it stays ended, and dropping it early releases whatever reader the
/// backend holds underneath.
pub struct TextStream {
    /// The stream of increments. Consume with `StreamExt::next()`.
    pub receiver: Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send>>,
}

impl TextStream {
    /// Wrap any sendable stream of increments.
    pub fn new(stream: impl Stream<Item = Result<String, ChatError>> + Send + 'static) -> Self {
        Self {
            receiver: Box::pin(stream),
        }
    }

    /// A stream built from a fixed list of increments.
    ///
    /// Handy for fakes and tests.
    #[must_use]
    pub fn from_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<Result<String, ChatError>> =
            chunks.into_iter().map(|c| Ok(c.into())).collect();
        Self::new(futures::stream::iter(items))
    }
}

impl Stream for TextStream {
    type Item = Result<String, ChatError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for TextStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextStream").finish_non_exhaustive()
    }
}
