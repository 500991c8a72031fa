use std::fmt;

use async_trait::async_trait;

use super::types::{Blog, Chat, GenerateOutcome, GenerateRequest, Message};

/// Errors that can occur while talking to the backend.
/// Every call is single-attempt; callers decide what to show.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Client misconfigured (bad base URL, TLS setup). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend answered with a non-success status.
    Api { status: u16, message: String },
    /// Backend answered with a body we could not understand.
    Parse(String),
}

impl ApiError {
    /// True when the backend could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The backend operations the workspace consumes.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Where requests go; used for logging and the title bar.
    fn base_url(&self) -> &str;

    /// Chats owned by the configured user.
    async fn list_chats(&self) -> Result<Vec<Chat>, ApiError>;

    async fn get_messages(&self, chat_id: i64) -> Result<Vec<Message>, ApiError>;

    async fn delete_chat(&self, chat_id: i64) -> Result<(), ApiError>;

    async fn delete_message(&self, message_id: i64) -> Result<(), ApiError>;

    async fn update_message(&self, message_id: i64, content: &str) -> Result<(), ApiError>;

    /// Generates a blog post and persists the user/assistant turn.
    ///
    /// A backend-reported failure is `Ok(GenerateOutcome::Rejected)`;
    /// `Err` means the call itself failed.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateOutcome, ApiError>;

    /// Blog archive of the configured user.
    async fn list_blogs(&self) -> Result<Vec<Blog>, ApiError>;
}
