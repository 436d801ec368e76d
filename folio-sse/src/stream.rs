//! Async adapter from a byte stream to decoded frames.

use futures::{Stream, StreamExt};

use crate::decoder::{SseDecoder, StreamFrame};

/// Decode a raw byte stream into [`StreamFrame`]s.
///
/// Accepts the shape `reqwest::Response::bytes_stream()` produces. The
/// returned stream ends right after the terminal frame without polling the
/// source again, ends when the source ends, and ends after forwarding the
/// first read error.
pub fn decode_stream<S, B, E>(byte_stream: S) -> impl Stream<Item = Result<StreamFrame, E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    async_stream::stream! {
        let mut decoder = SseDecoder::new();
        let mut byte_stream = std::pin::pin!(byte_stream);

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            for frame in decoder.push_bytes(chunk.as_ref()) {
                yield Ok(frame);
            }
            if decoder.is_finished() {
                return;
            }
        }

        if let Some(tail) = decoder.finish() {
            tracing::trace!(tail = %tail, "stream ended inside an unterminated line");
        }
    }
}
