//! RAG chat API client struct and builder.

use std::future::Future;

use folio_types::{
    ChatBackend, ChatError, ChatRequest, ChatResponse, DEFAULT_SESSION_ID, HealthStatus,
    TextStream,
};
use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, normalize_base_url};
use crate::error::{map_http_status, map_reqwest_error};
use crate::streaming::{ChatStream, stream_reply};

/// Client for the portfolio RAG chat backend.
///
/// Holds no conversation state; every call is one request/response exchange.
/// Cloning is cheap and shares the underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use folio_client::RagApi;
///
/// let api = RagApi::new("https://rag.example.com/")
///     .bearer_token("eyJhbGciOi...")
///     .session_id(7);
/// ```
#[derive(Clone)]
pub struct RagApi {
    /// Backend base URL, without a trailing slash.
    pub(crate) base_url: String,
    /// Conversation used by [`RagApi::stream_chat`] and [`RagApi::chat`].
    pub(crate) session_id: u64,
    /// Optional bearer credential.
    pub(crate) bearer_token: Option<String>,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl RagApi {
    /// Create a client for the backend at `base_url`.
    ///
    /// Default session: `1` (the demo session). No credential.
    #[must_use]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
            session_id: DEFAULT_SESSION_ID,
            bearer_token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from a [`ClientConfig`].
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        let api = Self::new(&config.base_url).session_id(config.session_id);
        match &config.bearer_token {
            Some(token) => api.bearer_token(token.clone()),
            None => api,
        }
    }

    /// Send `Authorization: Bearer <token>` on every request.
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Override the conversation to chat in.
    #[must_use]
    pub fn session_id(mut self, session_id: u64) -> Self {
        self.session_id = session_id;
        self
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots, timeouts).
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Start a streamed reply to `message` in the configured session.
    pub async fn stream_chat(&self, message: &str) -> Result<ChatStream, ChatError> {
        self.stream_chat_in(self.session_id, message).await
    }

    /// Start a streamed reply to `message` in `session_id`.
    ///
    /// Fails with [`ChatError::Transport`] on a non-success status, before
    /// anything is yielded. The returned stream ends at `data: [DONE]` or when
    /// the body ends, whichever comes first.
    pub async fn stream_chat_in(
        &self,
        session_id: u64,
        message: &str,
    ) -> Result<ChatStream, ChatError> {
        let url = self.url("/api/v1/chat/stream");
        let body = ChatRequest {
            message: message.to_string(),
            session_id,
        };

        tracing::debug!(url = %url, session_id, "sending streaming chat request");

        let response = self.send(self.client.post(&url).json(&body)).await?;
        Ok(stream_reply(response))
    }

    /// Ask for a complete, non-streamed answer.
    pub async fn chat(&self, message: &str) -> Result<ChatResponse, ChatError> {
        let url = self.url("/api/v1/chat");
        let body = ChatRequest {
            message: message.to_string(),
            session_id: self.session_id,
        };

        tracing::debug!(url = %url, session_id = self.session_id, "sending chat request");

        self.send_json(self.client.post(&url).json(&body)).await
    }

    /// Probe the backend's liveness endpoint.
    pub async fn health(&self) -> Result<HealthStatus, ChatError> {
        let url = self.url("/health");
        tracing::trace!(url = %url, "probing backend health");
        self.send_json(self.client.get(&url)).await
    }

    /// Attach credentials, send, and reject non-success statuses.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ChatError> {
        let request = match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_status(status, &body_text));
        }
        Ok(response)
    }

    /// [`send`](Self::send), then decode the body as JSON.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ChatError> {
        let response = self.send(request).await?;
        let text = response.text().await.map_err(map_reqwest_error)?;
        serde_json::from_str(&text)
            .map_err(|e| ChatError::InvalidResponse(format!("invalid JSON response: {e}")))
    }
}

impl std::fmt::Debug for RagApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagApi")
            .field("base_url", &self.base_url)
            .field("session_id", &self.session_id)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl ChatBackend for RagApi {
    fn stream_chat(
        &self,
        message: String,
    ) -> impl Future<Output = Result<TextStream, ChatError>> + Send {
        let api = self.clone();
        async move {
            RagApi::stream_chat(&api, &message)
                .await
                .map(ChatStream::into_text_stream)
        }
    }

    fn health(&self) -> impl Future<Output = Result<HealthStatus, ChatError>> + Send {
        let api = self.clone();
        async move { RagApi::health(&api).await }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_is_demo_session() {
        let api = RagApi::new("http://localhost:8000");
        assert_eq!(api.session_id, DEFAULT_SESSION_ID);
        assert!(api.bearer_token.is_none());
    }

    #[test]
    fn trailing_slash_is_removed() {
        let api = RagApi::new("http://localhost:8000/");
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(
            api.url("/api/v1/chat/stream"),
            "http://localhost:8000/api/v1/chat/stream"
        );
    }

    #[test]
    fn builder_sets_token_and_session() {
        let api = RagApi::new("http://localhost:8000")
            .bearer_token("tok")
            .session_id(9);
        assert_eq!(api.bearer_token.as_deref(), Some("tok"));
        assert_eq!(api.session_id, 9);
    }

    #[test]
    fn from_config_copies_fields() {
        let config = ClientConfig {
            base_url: "http://rag.local".into(),
            session_id: 5,
            bearer_token: Some("secret".into()),
        };
        let api = RagApi::from_config(&config);
        assert_eq!(api.base_url(), "http://rag.local");
        assert_eq!(api.session_id, 5);
        assert_eq!(api.bearer_token.as_deref(), Some("secret"));
    }

    #[test]
    fn debug_redacts_token() {
        let api = RagApi::new("http://x").bearer_token("super-secret");
        let debug = format!("{api:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn empty_base_url_yields_relative_paths() {
        let api = RagApi::from_config(&ClientConfig::default());
        assert_eq!(api.url("/health"), "/health");
    }
}
