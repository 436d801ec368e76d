//! Streamed reply handle for the chat stream endpoint.

use std::pin::Pin;
use std::task::{Context, Poll};

use folio_sse::decode_stream;
use folio_types::{ChatError, TextStream};
use futures::{Stream, StreamExt};
use reqwest::Response;

use crate::error::map_body_error;

/// A streamed assistant reply.
///
/// Lazy and consume-once: increments are read from the response body only as
/// the caller polls. The handle owns the response; dropping it (after the
/// end, after an error, or halfway through) releases the connection.
pub struct ChatStream {
    inner: Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send>>,
    yielded: usize,
    done: bool,
}

impl ChatStream {
    fn new(inner: impl Stream<Item = Result<String, ChatError>> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(inner),
            yielded: 0,
            done: false,
        }
    }

    /// Number of increments yielded so far.
    #[must_use]
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Erase the concrete type for use through [`ChatBackend`](folio_types::ChatBackend).
    #[must_use]
    pub fn into_text_stream(self) -> TextStream {
        TextStream::new(self)
    }

    /// Drain the stream and concatenate every increment.
    pub async fn collect_text(mut self) -> Result<String, ChatError> {
        let mut text = String::new();
        while let Some(chunk) = self.next().await {
            text.push_str(&chunk?);
        }
        Ok(text)
    }
}

impl Stream for ChatStream {
    type Item = Result<String, ChatError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }
        let polled = self.inner.as_mut().poll_next(cx);
        match &polled {
            Poll::Ready(Some(Ok(_))) => self.yielded += 1,
            Poll::Ready(Some(Err(_))) | Poll::Ready(None) => self.done = true,
            Poll::Pending => {}
        }
        polled
    }
}

impl Drop for ChatStream {
    fn drop(&mut self) {
        tracing::trace!(
            yielded = self.yielded,
            completed = self.done,
            "released chat stream reader"
        );
    }
}

impl std::fmt::Debug for ChatStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStream")
            .field("yielded", &self.yielded)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

/// Wrap a successful response into a [`ChatStream`].
pub(crate) fn stream_reply(response: Response) -> ChatStream {
    let increments = decode_stream(response.bytes_stream()).filter_map(|frame| async move {
        match frame {
            Ok(frame) if frame.is_terminal => None,
            Ok(frame) => Some(Ok(frame.payload)),
            Err(e) => Some(Err(map_body_error(e))),
        }
    });
    ChatStream::new(increments)
}
