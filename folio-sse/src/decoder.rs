//! Line-buffered `data:` decoder.

/// Prefix that marks an event line carrying a payload.
pub const DATA_PREFIX: &str = "data: ";

/// Payload value that ends the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One decoded unit of streamed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFrame {
    /// Decoded payload. Empty for the terminal frame.
    pub payload: String,
    /// Whether this frame ends the stream.
    pub is_terminal: bool,
}

impl StreamFrame {
    /// A payload-carrying frame.
    #[must_use]
    pub fn data(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            is_terminal: false,
        }
    }

    /// The end-of-stream frame.
    #[must_use]
    pub fn terminal() -> Self {
        Self {
            payload: String::new(),
            is_terminal: true,
        }
    }
}

/// Incremental decoder for `data: <payload>` lines.
///
/// Segments may split lines (and UTF-8 sequences, via [`push_bytes`]) at any
/// point. Only complete lines produce frames. Once the `[DONE]` sentinel is
/// seen the decoder is finished and ignores all further input.
///
/// Only the `data` field is understood. Blank separator lines, `event:`,
/// `id:` and `:` comment lines are skipped, and multi-line event bodies are
/// not joined: every `data:` line is its own frame.
///
/// # Example
///
/// ```
/// use folio_sse::{SseDecoder, StreamFrame};
///
/// let mut decoder = SseDecoder::new();
/// assert!(decoder.push("data: hel").is_empty());
/// assert_eq!(decoder.push("lo\n"), vec![StreamFrame::data("hello")]);
/// assert_eq!(decoder.push("data: [DONE]\n"), vec![StreamFrame::terminal()]);
/// assert!(decoder.push("data: late\n").is_empty());
/// ```
///
/// [`push_bytes`]: SseDecoder::push_bytes
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Text after the last line break; an incomplete line.
    line_buf: String,
    /// Bytes of a UTF-8 sequence split across chunks.
    pending_bytes: Vec<u8>,
    finished: bool,
}

impl SseDecoder {
    /// Create an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the sentinel has been seen.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed a text segment and return the frames for every line it completes.
    pub fn push(&mut self, segment: &str) -> Vec<StreamFrame> {
        if self.finished {
            return Vec::new();
        }

        // The held-back fragment has no line break, so scanning starts at `segment`.
        let mut scan_from = self.line_buf.len();
        self.line_buf.push_str(segment);

        let mut frames = Vec::new();
        let mut consumed = 0;
        while let Some(offset) = self.line_buf[scan_from..].find('\n') {
            let end = scan_from + offset;
            let line = self.line_buf[consumed..end].trim_end_matches('\r');
            consumed = end + 1;
            scan_from = consumed;

            if let Some(frame) = decode_line(line) {
                let terminal = frame.is_terminal;
                frames.push(frame);
                if terminal {
                    self.finished = true;
                    self.line_buf.clear();
                    return frames;
                }
            }
        }
        self.line_buf.drain(..consumed);
        frames
    }

    /// Feed raw bytes.
    ///
    /// A UTF-8 sequence cut off at the end of `bytes` is held back until the
    /// rest arrives. Invalid sequences decode to U+FFFD.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Vec<StreamFrame> {
        if self.finished {
            return Vec::new();
        }
        self.pending_bytes.extend_from_slice(bytes);
        let text = take_utf8_prefix(&mut self.pending_bytes);
        self.push(&text)
    }

    /// End of input.
    ///
    /// Returns the unterminated tail, if any. The tail never becomes a frame;
    /// it is handed back only so the caller can log it.
    #[must_use]
    pub fn finish(mut self) -> Option<String> {
        if self.finished {
            return None;
        }
        if !self.pending_bytes.is_empty() {
            let rest = String::from_utf8_lossy(&self.pending_bytes).into_owned();
            self.line_buf.push_str(&rest);
        }
        if self.line_buf.is_empty() {
            None
        } else {
            Some(self.line_buf)
        }
    }
}

fn decode_line(line: &str) -> Option<StreamFrame> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    if payload.trim() == DONE_SENTINEL {
        Some(StreamFrame::terminal())
    } else {
        Some(StreamFrame::data(payload))
    }
}

/// Drain the longest decodable prefix of `buf`, leaving an incomplete
/// trailing sequence in place.
fn take_utf8_prefix(buf: &mut Vec<u8>) -> String {
    let mut out = String::with_capacity(buf.len());
    loop {
        match std::str::from_utf8(buf) {
            Ok(s) => {
                out.push_str(s);
                buf.clear();
                return out;
            }
            Err(e) => {
                let valid = e.valid_up_to();
                out.push_str(&String::from_utf8_lossy(&buf[..valid]));
                match e.error_len() {
                    // Incomplete sequence at the end: wait for more bytes
                    None => {
                        buf.drain(..valid);
                        return out;
                    }
                    Some(len) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        buf.drain(..valid + len);
                    }
                }
            }
        }
    }
}
