//! The chat session state machine.

use std::sync::{Arc, Weak};
use std::time::Duration;

use folio_types::{ChatBackend, ChatError, Message};
use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::health::ApiStatus;
use crate::mock::{GREETING, MockResponder};

/// Pause before a canned answer replaces a failed reply.
pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(500);

/// Configuration for a [`ChatSession`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// First assistant message of the transcript, if any.
    pub greeting: Option<String>,
    /// Pause between a failure and the canned answer.
    pub fallback_delay: Duration,
    /// Source of canned answers.
    pub responder: MockResponder,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: None,
            fallback_delay: DEFAULT_FALLBACK_DELAY,
            responder: MockResponder::default(),
        }
    }
}

impl SessionConfig {
    /// The portfolio widget's setup: default settings plus the greeting.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            greeting: Some(GREETING.to_string()),
            ..Self::default()
        }
    }
}

/// Where a session is in its send cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Ready to accept a query.
    Idle,
    /// A query was submitted and its reply is not finished.
    AwaitingResponse,
}

/// Progress notifications for a UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionEvent {
    /// A text increment was appended to the trailing assistant message.
    Delta(String),
    /// The live reply finished.
    Completed,
    /// The reply was replaced by this canned answer.
    FellBack(String),
    /// The reply was abandoned because the session was cancelled.
    Cancelled,
}

/// Proof that a query was accepted, redeemed with [`ChatSession::respond`].
///
/// The session is busy exactly as long as this value, or the `respond` call
/// that consumed it, is alive. Dropping either abandons the reply and the
/// session goes back to [`SessionState::Idle`], keeping whatever text had
/// arrived.
#[derive(Debug)]
#[must_use = "dropping a pending reply abandons the query"]
pub struct PendingReply {
    query: String,
    ticket: Arc<()>,
}

impl PendingReply {
    /// The accepted query, exactly as submitted.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// How a reply ended.
#[derive(Debug)]
pub enum ReplyOutcome {
    /// The backend streamed a non-blank answer.
    Live,
    /// The backend failed; the trailing message holds a canned answer.
    Fallback(ChatError),
    /// The session was cancelled before the reply finished.
    Cancelled,
    /// The pending reply was not issued by this session, or was superseded;
    /// nothing changed.
    Rejected,
}

impl ReplyOutcome {
    /// Whether the answer came from the backend.
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, ReplyOutcome::Live)
    }

    /// Whether the answer came from the canned table.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, ReplyOutcome::Fallback(_))
    }
}

enum Interrupt {
    Cancelled,
    Failed(ChatError),
}

impl From<ChatError> for Interrupt {
    fn from(e: ChatError) -> Self {
        Interrupt::Failed(e)
    }
}

/// A single chat conversation against a [`ChatBackend`].
///
/// Owns the transcript and an input buffer. A session accepts one query at a
/// time: [`submit`](Self::submit) is a no-op while a reply is in flight.
/// Replies always end in exactly one assistant message, either the streamed
/// text or a canned answer from the configured [`MockResponder`].
///
/// Every mutator takes `&mut self`; a UI that wants to repaint while a reply
/// streams in should [`subscribe`](Self::subscribe) to [`SessionEvent`]s.
///
/// A reply future that is dropped before it completes (a timeout, a losing
/// `select!` branch) releases the session just like a finished one.
///
/// Dropping the session cancels its [`CancellationToken`].
pub struct ChatSession<B> {
    backend: B,
    config: SessionConfig,
    messages: Vec<Message>,
    input: String,
    /// Live while the [`PendingReply`] for the current query exists.
    in_flight: Weak<()>,
    cancel: CancellationToken,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
    status: Option<watch::Sender<ApiStatus>>,
}

impl<B: ChatBackend> ChatSession<B> {
    /// A session with default settings and an empty transcript.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, SessionConfig::default())
    }

    /// A session with explicit settings.
    pub fn with_config(backend: B, config: SessionConfig) -> Self {
        let messages = config
            .greeting
            .as_ref()
            .map(|greeting| vec![Message::assistant(greeting.clone())])
            .unwrap_or_default();
        Self {
            backend,
            config,
            messages,
            input: String::new(),
            in_flight: Weak::new(),
            cancel: CancellationToken::new(),
            events: None,
            status: None,
        }
    }

    /// Receive [`SessionEvent`]s from now on.
    ///
    /// Replaces any earlier subscriber.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    /// Mark the API offline on this channel whenever a reply falls back.
    pub fn attach_status(&mut self, status: watch::Sender<ApiStatus>) {
        self.status = Some(status);
    }

    /// The transcript, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.in_flight.strong_count() > 0 {
            SessionState::AwaitingResponse
        } else {
            SessionState::Idle
        }
    }

    /// Whether a reply is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state() == SessionState::AwaitingResponse
    }

    /// Whether [`close`](Self::close) was called or the token was cancelled.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The session's settings.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The backend replies are requested from.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// A handle that cancels the in-flight reply and closes the session.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel the in-flight reply, if any, and reject further queries.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Replace the input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// The input buffer.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Submit the input buffer.
    ///
    /// On rejection the buffer is left untouched.
    pub fn submit_input(&mut self) -> Option<PendingReply> {
        if !self.accepts(&self.input) {
            return None;
        }
        let query = std::mem::take(&mut self.input);
        self.submit(query)
    }

    /// Accept `query` and record it as a user message.
    ///
    /// Returns `None`, changing nothing, when the query is blank, a reply is
    /// already in flight, or the session is closed. Otherwise clears the input
    /// buffer and moves to [`SessionState::AwaitingResponse`].
    pub fn submit(&mut self, query: impl Into<String>) -> Option<PendingReply> {
        let query = query.into();
        if !self.accepts(&query) {
            tracing::trace!(state = ?self.state(), "query rejected");
            return None;
        }
        self.messages.push(Message::user(query.clone()));
        self.input.clear();
        let ticket = Arc::new(());
        self.in_flight = Arc::downgrade(&ticket);
        Some(PendingReply { query, ticket })
    }

    fn accepts(&self, query: &str) -> bool {
        self.state() == SessionState::Idle && !self.is_closed() && !query.trim().is_empty()
    }

    /// Produce the reply to an accepted query.
    ///
    /// Appends one assistant message and grows it as increments arrive. If
    /// the request fails, the stream errors, or the finished text is blank,
    /// the message is emptied and, after the fallback delay, filled with the
    /// canned answer. Always returns the session to [`SessionState::Idle`].
    ///
    /// A `pending` reply from another session, or one for an abandoned query,
    /// yields [`ReplyOutcome::Rejected`] without touching the transcript.
    pub async fn respond(&mut self, pending: PendingReply) -> ReplyOutcome {
        let PendingReply { query, ticket } = pending;
        let current = self
            .in_flight
            .upgrade()
            .is_some_and(|live| Arc::ptr_eq(&live, &ticket));
        if !current {
            tracing::debug!("pending reply does not belong to this session");
            return ReplyOutcome::Rejected;
        }
        self.messages.push(Message::assistant(""));

        let outcome = match self.stream_reply(&query).await {
            Ok(()) => {
                self.emit(SessionEvent::Completed);
                ReplyOutcome::Live
            }
            Err(Interrupt::Failed(reason)) => self.fall_back(&query, reason).await,
            Err(Interrupt::Cancelled) => ReplyOutcome::Cancelled,
        };

        if matches!(outcome, ReplyOutcome::Cancelled) {
            tracing::debug!("reply cancelled");
            self.emit(SessionEvent::Cancelled);
        }
        drop(ticket);
        outcome
    }

    /// [`submit`](Self::submit) then [`respond`](Self::respond).
    ///
    /// Returns `None` when the query was rejected.
    pub async fn send(&mut self, query: impl Into<String>) -> Option<ReplyOutcome> {
        let pending = self.submit(query)?;
        Some(self.respond(pending).await)
    }

    async fn stream_reply(&mut self, query: &str) -> Result<(), Interrupt> {
        let cancel = self.cancel.clone();

        let mut stream = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(Interrupt::Cancelled),
            result = self.backend.stream_chat(query.to_string()) => result?,
        };

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(Interrupt::Cancelled),
                next = stream.next() => next,
            };
            match next {
                Some(Ok(chunk)) => self.append(chunk),
                Some(Err(e)) => return Err(e.into()),
                None => break,
            }
        }

        if self.messages.last().is_none_or(Message::is_blank) {
            return Err(ChatError::EmptyStream.into());
        }
        Ok(())
    }

    fn append(&mut self, chunk: String) {
        if let Some(reply) = self.messages.last_mut() {
            reply.content.push_str(&chunk);
        }
        self.emit(SessionEvent::Delta(chunk));
    }

    async fn fall_back(&mut self, query: &str, reason: ChatError) -> ReplyOutcome {
        tracing::warn!(error = %reason, "chat API unavailable, answering from canned responses");
        if let Some(status) = &self.status {
            status.send_replace(ApiStatus::Offline);
        }
        if let Some(reply) = self.messages.last_mut() {
            reply.content.clear();
        }

        let cancel = self.cancel.clone();
        tokio::select! {
            biased;
            () = cancel.cancelled() => return ReplyOutcome::Cancelled,
            () = tokio::time::sleep(self.config.fallback_delay) => {}
        }

        let answer = self.config.responder.respond(query).to_string();
        if let Some(reply) = self.messages.last_mut() {
            reply.content.clone_from(&answer);
        }
        self.emit(SessionEvent::FellBack(answer));
        ReplyOutcome::Fallback(reason)
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(events) = &self.events {
            // A dropped receiver just means nobody is repainting.
            let _ = events.send(event);
        }
    }
}

impl<B> Drop for ChatSession<B> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<B: ChatBackend> std::fmt::Debug for ChatSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("state", &self.state())
            .field("messages", &self.messages.len())
            .field("closed", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
