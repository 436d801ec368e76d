//! Client configuration.

use folio_types::DEFAULT_SESSION_ID;

/// Environment variable holding the backend base URL.
pub const ENV_API_URL: &str = "FOLIO_API_URL";

/// Environment variable holding the backend session id.
pub const ENV_SESSION_ID: &str = "FOLIO_SESSION_ID";

/// Environment variable holding the bearer token (the widget's `access_token`).
pub const ENV_ACCESS_TOKEN: &str = "FOLIO_ACCESS_TOKEN";

/// Static configuration for a [`RagApi`](crate::RagApi).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    ///
    /// Empty means "no backend configured": every request fails and the
    /// session answers from its canned responses.
    pub base_url: String,

    /// Backend conversation to chat in.
    pub session_id: u64,

    /// Optional bearer credential. `None` sends no `Authorization` header.
    pub bearer_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            session_id: DEFAULT_SESSION_ID,
            bearer_token: None,
        }
    }
}

impl ClientConfig {
    /// Read the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// Unset or blank values keep their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.base_url = normalize_base_url(&url);
        }

        if let Some(raw) = lookup(ENV_SESSION_ID).filter(|v| !v.trim().is_empty()) {
            match raw.trim().parse() {
                Ok(id) => config.session_id = id,
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    "ignoring invalid {ENV_SESSION_ID}, using session {DEFAULT_SESSION_ID}"
                ),
            }
        }

        config.bearer_token = lookup(ENV_ACCESS_TOKEN).filter(|t| !t.is_empty());
        config
    }
}

/// Trim whitespace and trailing slashes so joined paths never contain `//`.
pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
