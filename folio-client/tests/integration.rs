//! Integration tests for the RAG chat client using wiremock.

use folio_client::{ChatBackend, RagApi};
use folio_types::{ChatError, Role};
use futures::StreamExt;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to build an SSE body string from a slice of data payloads.
fn sse_body(data_lines: &[&str]) -> String {
    let mut body = String::new();
    for line in data_lines {
        body.push_str(&format!("data: {line}\n\n"));
    }
    body
}

async fn mount_stream(server: &MockServer, body: String) {
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn stream_chat_sends_query_and_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat/stream"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "message": "What is RAG?",
            "session_id": 1
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&["Hel", "lo!", "[DONE]"]), "text/event-stream"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = RagApi::new(mock_server.uri());
    let stream = api.stream_chat("What is RAG?").await.unwrap();
    let chunks: Vec<String> = stream.map(|c| c.unwrap()).collect().await;
    assert_eq!(chunks, vec!["Hel", "lo!"]);
}

#[tokio::test]
async fn stream_chat_in_overrides_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat/stream"))
        .and(body_json(serde_json::json!({"message": "hi", "session_id": 12})))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&["ok", "[DONE]"]), "text/event-stream"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = RagApi::new(mock_server.uri());
    let text = api
        .stream_chat_in(12, "hi")
        .await
        .unwrap()
        .collect_text()
        .await
        .unwrap();
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn bearer_header_sent_when_token_present() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat/stream"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&["x", "[DONE]"]), "text/event-stream"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = RagApi::new(mock_server.uri()).bearer_token("tok-123");
    let text = api.stream_chat("q").await.unwrap().collect_text().await.unwrap();
    assert_eq!(text, "x");
}

#[tokio::test]
async fn no_authorization_header_without_token() {
    let mock_server = MockServer::start().await;
    mount_stream(&mock_server, sse_body(&["x", "[DONE]"])).await;

    let api = RagApi::new(mock_server.uri());
    api.stream_chat("q").await.unwrap().collect_text().await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn non_success_status_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat/stream"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let api = RagApi::new(mock_server.uri());
    let err = api.stream_chat("q").await.unwrap_err();
    match err {
        ChatError::Transport { status, reason } => {
            assert_eq!(status, 503);
            assert_eq!(reason, "Service Unavailable");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn data_after_sentinel_is_ignored() {
    let mock_server = MockServer::start().await;
    mount_stream(&mock_server, sse_body(&["a", "[DONE]", "b", "c"])).await;

    let api = RagApi::new(mock_server.uri());
    let text = api.stream_chat("q").await.unwrap().collect_text().await.unwrap();
    assert_eq!(text, "a");
}

#[tokio::test]
async fn stream_without_sentinel_ends_with_body() {
    let mock_server = MockServer::start().await;
    let body = format!("{}data: dangling", sse_body(&["one", "two"]));
    mount_stream(&mock_server, body).await;

    let api = RagApi::new(mock_server.uri());
    let text = api.stream_chat("q").await.unwrap().collect_text().await.unwrap();
    assert_eq!(text, "onetwo");
}

#[tokio::test]
async fn sentinel_only_stream_yields_nothing() {
    let mock_server = MockServer::start().await;
    mount_stream(&mock_server, sse_body(&["[DONE]"])).await;

    let api = RagApi::new(mock_server.uri());
    let mut stream = api.stream_chat("q").await.unwrap();
    assert!(stream.next().await.is_none());
    assert_eq!(stream.yielded(), 0);
}

#[tokio::test]
async fn non_data_lines_are_skipped() {
    let mock_server = MockServer::start().await;
    let body = ": heartbeat\nevent: token\ndata: A\r\n\r\nretry: 10\ndata: B\n\ndata: [DONE]\n\n";
    mount_stream(&mock_server, body.to_string()).await;

    let api = RagApi::new(mock_server.uri());
    let text = api.stream_chat("q").await.unwrap().collect_text().await.unwrap();
    assert_eq!(text, "AB");
}

#[tokio::test]
async fn abandoning_a_stream_early_is_fine() {
    let mock_server = MockServer::start().await;
    mount_stream(&mock_server, sse_body(&["first", "second", "[DONE]"])).await;

    let api = RagApi::new(mock_server.uri());
    let mut stream = api.stream_chat("q").await.unwrap();
    assert_eq!(stream.next().await.unwrap().unwrap(), "first");
    drop(stream);

    // The client is still usable after a reader was released mid-stream.
    let text = api.stream_chat("q").await.unwrap().collect_text().await.unwrap();
    assert_eq!(text, "firstsecond");
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let api = RagApi::new("http://127.0.0.1:1");
    let err = api.stream_chat("q").await.unwrap_err();
    assert!(matches!(err, ChatError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn unconfigured_backend_is_network_error() {
    let api = RagApi::new("");
    let err = api.stream_chat("q").await.unwrap_err();
    assert!(matches!(err, ChatError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn chat_backend_trait_streams_through_text_stream() {
    let mock_server = MockServer::start().await;
    mount_stream(&mock_server, sse_body(&["Hel", "lo!", "[DONE]"])).await;

    let api = RagApi::new(mock_server.uri());
    let stream = ChatBackend::stream_chat(&api, "hi".to_string()).await.unwrap();
    let chunks: Vec<String> = stream.map(|c| c.unwrap()).collect().await;
    assert_eq!(chunks.concat(), "Hello!");
}

#[tokio::test]
async fn chat_returns_complete_answer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat"))
        .and(body_json(serde_json::json!({"message": "What is RAG?", "session_id": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "Retrieval-Augmented Generation.",
            "session_id": 1,
            "intent": "question",
            "sources": ["rag.md"],
            "metadata": {"confidence": 0.8},
            "timestamp": "2024-05-01T12:00:00"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = RagApi::new(mock_server.uri());
    let resp = api.chat("What is RAG?").await.unwrap();
    assert_eq!(resp.response, "Retrieval-Augmented Generation.");
    assert_eq!(resp.intent, "question");
    assert_eq!(resp.metadata.unwrap().confidence, Some(0.8));
}

#[tokio::test]
async fn chat_error_includes_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&mock_server)
        .await;

    let api = RagApi::new(mock_server.uri());
    let err = api.chat("q").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("invalid token"));
}

#[tokio::test]
async fn health_reports_status_and_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "healthy", "version": "2.1.0"})),
        )
        .mount(&mock_server)
        .await;

    let api = RagApi::new(mock_server.uri());
    let health = api.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version.as_deref(), Some("2.1.0"));
}

#[tokio::test]
async fn health_failure_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let api = RagApi::new(mock_server.uri());
    let err = api.health().await.unwrap_err();
    assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn health_with_bad_json_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&mock_server)
        .await;

    let api = RagApi::new(mock_server.uri());
    let err = api.health().await.unwrap_err();
    assert!(matches!(err, ChatError::InvalidResponse(_)), "got {err:?}");
}

fn session_json(id: u64, title: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "memory_type": "sliding_window",
        "context_window": 10,
        "is_active": true,
        "created_at": "2024-05-01T12:00:00",
        "updated_at": "2024-05-01T12:05:00"
    })
}

#[tokio::test]
async fn list_sessions_passes_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/sessions"))
        .and(query_param("limit", "10"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sessions": [session_json(1, "Demo"), session_json(2, "Other")],
            "total": 2
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = RagApi::new(mock_server.uri()).bearer_token("tok");
    let page = api
        .list_sessions(folio_client::sessions::DEFAULT_SESSIONS_LIMIT)
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.sessions[1].title, "Other");
}

#[tokio::test]
async fn session_messages_decodes_history() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/sessions/3/messages"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": [
                {"role": "user", "content": "hi", "timestamp": "2024-05-01T12:00:00"},
                {"role": "assistant", "content": "Hey", "timestamp": "2024-05-01T12:00:01.250000"},
                {"role": "assistant", "content": "Hello!"}
            ],
            "total": 3,
            "session_id": 3
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = RagApi::new(mock_server.uri());
    let page = api
        .session_messages(3, folio_client::sessions::DEFAULT_MESSAGES_LIMIT)
        .await
        .unwrap();
    assert_eq!(page.session_id, 3);
    assert_eq!(page.messages.len(), 3);
    assert_eq!(page.messages[1].role, Role::Assistant);
    assert_eq!(
        page.messages[0].timestamp.unwrap().to_rfc3339(),
        "2024-05-01T12:00:00+00:00"
    );
    assert_eq!(
        page.messages[1].timestamp.unwrap().timestamp_subsec_millis(),
        250
    );
    assert!(page.messages[2].timestamp.is_none());
}

#[tokio::test]
async fn create_session_posts_title() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/sessions"))
        .and(body_json(serde_json::json!({"title": "New Chat"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"session": session_json(4, "New Chat")})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = RagApi::new(mock_server.uri());
    let created = api
        .create_session(folio_client::sessions::DEFAULT_SESSION_TITLE)
        .await
        .unwrap();
    assert_eq!(created.session.id, 4);
}

#[tokio::test]
async fn delete_session_accepts_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/sessions/4"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = RagApi::new(mock_server.uri());
    api.delete_session(4).await.unwrap();
}

#[tokio::test]
async fn delete_missing_session_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/sessions/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let api = RagApi::new(mock_server.uri());
    let err = api.delete_session(99).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}
