use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ApiError;

/// Fallback text when the backend reports a failure without a `detail`.
pub const DEFAULT_FAILURE_DETAIL: &str = "Unable to process request.";

/// Who authored a message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A persisted chat session as listed by `GET /chats`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Chat {
    pub id: i64,
    pub title: String,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

/// A persisted message as listed by `GET /chats/{id}/messages`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: i64,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

/// A generated blog post from the archive (`GET /blogs`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Blog {
    pub id: i64,
    pub topic: String,
    pub content: String,
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
}

/// Body of `POST /generate-blog`.
///
/// `chat_id: None` asks the backend to create a new chat for this turn.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub topic: String,
    pub user_id: i64,
    pub chat_id: Option<i64>,
}

/// Raw `POST /generate-blog` response. Every field is optional on the wire
/// because failures only carry `detail`.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub user_message_id: Option<i64>,
    #[serde(default)]
    pub assistant_message_id: Option<i64>,
    #[serde(default)]
    pub chat_id: Option<i64>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

/// The persisted turn returned by a successful generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTurn {
    pub content: String,
    pub image_url: Option<String>,
    pub user_message_id: i64,
    pub assistant_message_id: i64,
    pub chat_id: i64,
}

/// Outcome of a generation call that reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    Generated(GeneratedTurn),
    /// The backend answered but refused or failed; `detail` is display-ready.
    Rejected { detail: String },
}

impl GenerateResponse {
    pub(crate) fn into_outcome(self) -> Result<GenerateOutcome, ApiError> {
        if !self.success {
            return Ok(GenerateOutcome::Rejected {
                detail: detail_text(self.detail.as_ref()),
            });
        }

        let missing = |field: &str| ApiError::Parse(format!("generate response missing `{field}`"));
        Ok(GenerateOutcome::Generated(GeneratedTurn {
            content: self.content.unwrap_or_default(),
            image_url: self.image_url.filter(|url| !url.is_empty()),
            user_message_id: self.user_message_id.ok_or_else(|| missing("user_message_id"))?,
            assistant_message_id: self
                .assistant_message_id
                .ok_or_else(|| missing("assistant_message_id"))?,
            chat_id: self.chat_id.ok_or_else(|| missing("chat_id"))?,
        }))
    }
}

/// Renders a backend `detail` for display: strings verbatim, structured
/// values (e.g. validation error lists) as compact JSON.
pub fn detail_text(detail: Option<&serde_json::Value>) -> String {
    match detail {
        None | Some(serde_json::Value::Null) => DEFAULT_FAILURE_DETAIL.to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Backend timestamps are naive UTC (`2024-05-01T10:00:00.123456`), but an
/// offset-qualified RFC 3339 value is accepted too and normalized to UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveDateTime, String> {
        NaiveDateTime::parse_from_str(raw, FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_utc()))
            .map_err(|e| format!("invalid timestamp `{raw}`: {e}"))
    }
}
