//! Canned answers used when the backend cannot reply.
//!
//! Matching is a case-insensitive substring scan over an ordered keyword
//! list; the first keyword contained in the query wins.

/// Answer returned when no keyword matches.
pub const DEFAULT_RESPONSE: &str = "That's an interesting question! In the full implementation, this would:\n\n1. Analyze your intent using hybrid detection\n2. Retrieve relevant context from Qdrant vector DB\n3. Combine vector search with BM25 keyword results\n4. Apply LLM reranking for best results\n5. Generate a response using retrieved context\n\nFeel free to ask about architecture, features, or technical details!";

/// Greeting shown as the first assistant message of a demo session.
pub const GREETING: &str =
    "Hello! I'm a RAG chatbot. Ask me about project architecture, features, or try any question!";

/// Keyword/answer pairs in match order.
///
/// `hi` comes last: it is contained in `architecture`, `this` and `which`.
pub const MOCK_RESPONSES: &[(&str, &str)] = &[
    (
        "architecture",
        "This RAG system uses a sophisticated architecture:\n\n• **Vector Search**: Qdrant vector database for semantic similarity\n• **Hybrid Search**: Combines vector search with BM25 keyword matching\n• **Intent Detection**: Hybrid rule-based + LLM-powered classification\n• **Memory Management**: Multiple strategies (sliding window, summarization, hybrid)\n• **Streaming**: Real-time server-sent events for faster response time",
    ),
    (
        "rag",
        "RAG (Retrieval-Augmented Generation) combines the power of retrieval systems with large language models. It retrieves relevant context from a knowledge base and uses it to generate accurate, contextual responses. This approach reduces hallucinations and keeps answers grounded in actual data.",
    ),
    (
        "features",
        "Key features include:\n\n✅ Hybrid Vector + BM25 Search\n✅ Multiple Intent Detection Strategies\n✅ Flexible Memory Management\n✅ Streaming Responses\n✅ Multi-LLM Support (OpenAI, Anthropic, GLM)\n✅ JWT Authentication\n✅ Rate Limiting\n✅ Docker & Kubernetes Ready",
    ),
    (
        "tech",
        "Tech Stack:\n\n• **Backend**: FastAPI, Python\n• **Vector DB**: Qdrant\n• **Databases**: PostgreSQL, Redis\n• **LLM**: OpenAI, Anthropic, or GLM APIs\n• **Deployment**: Docker, Kubernetes\n• **Testing**: 335+ test cases, 80%+ coverage",
    ),
    (
        "demo",
        "This is a frontend demo with placeholder responses. The full backend integrates with real LLM APIs and supports streaming responses, document upload, and advanced RAG features.",
    ),
    (
        "api",
        "The API provides:\n\n• POST /api/v1/chat - Send messages\n• POST /api/v1/chat/stream - Stream responses\n• POST /api/v1/documents/upload - Upload documents\n• POST /api/v1/documents/search - Search knowledge base\n• JWT-based authentication\n• Comprehensive error handling",
    ),
    (
        "hello",
        "Hello! This is a RAG chatbot demo. I can answer questions about project, demonstrate retrieval capabilities, and showcase chat interface. Ask me anything!",
    ),
    (
        "hi",
        "Hi there! I'm RAG chatbot demo. Feel free to ask me about project architecture, features, or try any question!",
    ),
];

/// Pick the built-in canned answer for `query`.
///
/// Pure and total: every query gets an answer.
///
/// # Example
///
/// ```
/// use folio_session::{DEFAULT_RESPONSE, mock_response};
/// assert!(mock_response("Tell me about the ARCHITECTURE").contains("Vector Search"));
/// assert_eq!(mock_response("asdkjasd"), DEFAULT_RESPONSE);
/// ```
#[must_use]
pub fn mock_response(query: &str) -> &'static str {
    let lower = query.to_lowercase();
    MOCK_RESPONSES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map_or(DEFAULT_RESPONSE, |(_, answer)| *answer)
}

/// A configurable keyword table with the same matching rules as
/// [`mock_response`].
///
/// Keywords are compared in lowercase, so store them lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponder {
    /// Keyword/answer pairs, scanned in order.
    pub entries: Vec<(String, String)>,
    /// Answer when nothing matches.
    pub default: String,
}

impl Default for MockResponder {
    fn default() -> Self {
        Self {
            entries: MOCK_RESPONSES
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            default: DEFAULT_RESPONSE.to_string(),
        }
    }
}

impl MockResponder {
    /// A responder with no keywords that always answers `default`.
    #[must_use]
    pub fn fixed(default: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            default: default.into(),
        }
    }

    /// Append a keyword/answer pair, matched after the existing ones.
    #[must_use]
    pub fn with_entry(mut self, keyword: impl Into<String>, answer: impl Into<String>) -> Self {
        self.entries
            .push((keyword.into().to_lowercase(), answer.into()));
        self
    }

    /// Pick the answer for `query`.
    #[must_use]
    pub fn respond(&self, query: &str) -> &str {
        let lower = query.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| lower.contains(keyword.as_str()))
            .map_or(self.default.as_str(), |(_, answer)| answer.as_str())
    }
}
