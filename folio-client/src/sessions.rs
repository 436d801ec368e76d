//! Backend conversation management.

use folio_types::{
    ChatError, CreateSessionRequest, MessagesResponse, SessionResponse, SessionsResponse,
};

use crate::client::RagApi;

/// Page size used by [`RagApi::list_sessions`] callers that have no preference.
pub const DEFAULT_SESSIONS_LIMIT: u32 = 10;

/// Page size used by [`RagApi::session_messages`] callers that have no preference.
pub const DEFAULT_MESSAGES_LIMIT: u32 = 50;

/// Title given to sessions created without one.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

impl RagApi {
    /// List up to `limit` sessions.
    pub async fn list_sessions(&self, limit: u32) -> Result<SessionsResponse, ChatError> {
        let url = self.url("/api/v1/sessions");
        tracing::debug!(url = %url, limit, "listing sessions");
        self.send_json(self.client.get(&url).query(&[("limit", limit)]))
            .await
    }

    /// Fetch up to `limit` messages of session `session_id`.
    pub async fn session_messages(
        &self,
        session_id: u64,
        limit: u32,
    ) -> Result<MessagesResponse, ChatError> {
        let url = self.url(&format!("/api/v1/sessions/{session_id}/messages"));
        tracing::debug!(url = %url, limit, "fetching session messages");
        self.send_json(self.client.get(&url).query(&[("limit", limit)]))
            .await
    }

    /// Create a new session titled `title`.
    pub async fn create_session(&self, title: &str) -> Result<SessionResponse, ChatError> {
        let url = self.url("/api/v1/sessions");
        let body = CreateSessionRequest {
            title: title.to_string(),
        };
        tracing::debug!(url = %url, title, "creating session");
        self.send_json(self.client.post(&url).json(&body)).await
    }

    /// Delete session `session_id`.
    pub async fn delete_session(&self, session_id: u64) -> Result<(), ChatError> {
        let url = self.url(&format!("/api/v1/sessions/{session_id}"));
        tracing::debug!(url = %url, "deleting session");
        self.send(self.client.delete(&url)).await?;
        Ok(())
    }
}
