//! JSON shapes exchanged with the RAG chat backend.

use serde::{Deserialize, Serialize};

use crate::types::Message;

/// Session used when the caller does not pick one (the public demo session).
pub const DEFAULT_SESSION_ID: u64 = 1;

/// Body of both the streaming and the non-streaming chat endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The visitor's query.
    pub message: String,
    /// Backend conversation to append to.
    pub session_id: u64,
}

/// Optional scoring details attached to a non-streamed answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Retrieval confidence in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Tokens spent producing the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
}

/// A complete, non-streamed answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Answer text.
    pub response: String,
    /// Session the answer was recorded in.
    pub session_id: u64,
    /// Intent the backend classified the query as.
    pub intent: String,
    /// Documents the answer was grounded on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    /// Scoring details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
    /// Server-side timestamp, as sent.
    pub timestamp: String,
}

/// A backend conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session id.
    pub id: u64,
    /// Display title.
    pub title: String,
    /// Memory strategy the backend uses for this session.
    pub memory_type: String,
    /// Number of past messages kept in context.
    pub context_window: u32,
    /// Whether the session still accepts messages.
    pub is_active: bool,
    /// Creation time, as sent.
    pub created_at: String,
    /// Last update time, as sent.
    pub updated_at: String,
}

/// Page of sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionsResponse {
    /// Sessions on this page.
    pub sessions: Vec<Session>,
    /// Total number of sessions.
    pub total: u64,
}

/// Page of a session's message history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagesResponse {
    /// Messages, oldest first.
    pub messages: Vec<Message>,
    /// Total number of messages in the session.
    pub total: u64,
    /// Session the messages belong to.
    pub session_id: u64,
}

/// A single session wrapped the way the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResponse {
    /// The session.
    pub session: Session,
}

/// Body of the create-session endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Display title.
    pub title: String,
}
