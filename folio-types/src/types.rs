//! The chat message model.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the visitor.
    User,
    /// Produced by the backend or the mock responder.
    Assistant,
    /// Only appears in history returned by the backend.
    System,
}

/// A single message in a chat transcript.
///
/// `content` grows while an assistant reply is streaming in. `timestamp` is
/// set once at creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the message.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// Creation time, if known.
    ///
    /// Accepts RFC 3339 as well as offset-less ISO 8601, which is read as UTC.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_timestamp"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a user message stamped with the current time.
    ///
    /// # Example
    ///
    /// ```
    /// use folio_types::{Message, Role};
    /// let msg = Message::user("Tell me about the architecture");
    /// assert_eq!(msg.role, Role::User);
    /// assert!(msg.timestamp.is_some());
    /// ```
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::stamped(Role::User, text)
    }

    /// Create an assistant message stamped with the current time.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::stamped(Role::Assistant, text)
    }

    /// Create a message with the given role and no timestamp.
    #[must_use]
    pub fn unstamped(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: text.into(),
            timestamp: None,
        }
    }

    fn stamped(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: text.into(),
            timestamp: Some(Utc::now()),
        }
    }

    /// Whether the message has no visible text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Parse a timestamp as sent by the backend.
///
/// RFC 3339 strings keep their offset (converted to UTC). Naive strings such
/// as `2024-05-01T12:30:00` or `2024-05-01 12:30:00.123456` are taken as UTC.
///
/// ```
/// use folio_types::parse_timestamp;
/// let naive = parse_timestamp("2024-05-01T12:30:00").unwrap();
/// let zulu = parse_timestamp("2024-05-01T12:30:00Z").unwrap();
/// assert_eq!(naive, zulu);
/// ```
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let raw = raw.trim();
    if let Ok(stamped) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamped.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_timestamp(&raw).map_err(serde::de::Error::custom))
        .transpose()
}
