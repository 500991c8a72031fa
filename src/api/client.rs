//! HTTP implementation of [`Backend`] over reqwest.
//!
//! Paths are appended to the configured base URL, which already includes the
//! `/api` prefix (e.g. `http://localhost:8000/api`).

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::backend::{ApiError, Backend};
use super::types::{
    Blog, Chat, GenerateOutcome, GenerateRequest, GenerateResponse, Message, detail_text,
};

/// User whose chats and blogs are listed unless [`HttpBackend::with_user_id`]
/// says otherwise. Matches the backend's own default.
const DEFAULT_USER_ID: i64 = 1;

/// Backend reachable over HTTP.
pub struct HttpBackend {
    base_url: String,
    user_id: i64,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Builds a client for `base_url`. `timeout: None` waits indefinitely.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base URL must start with http:// or https://, got `{base_url}`"
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            base_url,
            user_id: DEFAULT_USER_ID,
            client,
        })
    }

    /// Scopes chat and blog listings to `user_id`.
    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = user_id;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request, turning transport failures and non-success
    /// statuses into [`ApiError`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(network_error)?;
        let status = response.status();
        debug!("Backend response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Backend error: {} - {}", status, body);
        Err(ApiError::Api {
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }
}

fn network_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Network(format!("request timed out: {e}"))
    } else {
        ApiError::Network(e.to_string())
    }
}

/// Prefers the backend's `detail` field; falls back to the raw body or the
/// status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return detail_text(Some(&parsed.detail));
    }
    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.trim().to_string()
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await.map_err(network_error)?;
    serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn list_chats(&self) -> Result<Vec<Chat>, ApiError> {
        debug!("GET /chats?user_id={}", self.user_id);
        let response = self
            .send(
                self.client
                    .get(self.url("/chats"))
                    .query(&[("user_id", self.user_id)]),
            )
            .await?;
        let chats: Vec<Chat> = read_json(response).await?;
        info!("Loaded {} chats", chats.len());
        Ok(chats)
    }

    async fn get_messages(&self, chat_id: i64) -> Result<Vec<Message>, ApiError> {
        debug!("GET /chats/{}/messages", chat_id);
        let response = self
            .send(self.client.get(self.url(&format!("/chats/{chat_id}/messages"))))
            .await?;
        let messages: Vec<Message> = read_json(response).await?;
        info!("Loaded {} messages for chat {}", messages.len(), chat_id);
        Ok(messages)
    }

    async fn delete_chat(&self, chat_id: i64) -> Result<(), ApiError> {
        info!("DELETE /chats/{}", chat_id);
        self.send(self.client.delete(self.url(&format!("/chats/{chat_id}"))))
            .await?;
        Ok(())
    }

    async fn delete_message(&self, message_id: i64) -> Result<(), ApiError> {
        info!("DELETE /messages/{}", message_id);
        self.send(self.client.delete(self.url(&format!("/messages/{message_id}"))))
            .await?;
        Ok(())
    }

    async fn update_message(&self, message_id: i64, content: &str) -> Result<(), ApiError> {
        info!("PATCH /messages/{} ({} bytes)", message_id, content.len());
        self.send(
            self.client
                .patch(self.url(&format!("/messages/{message_id}")))
                .query(&[("content", content)]),
        )
        .await?;
        Ok(())
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateOutcome, ApiError> {
        info!(
            "POST /generate-blog: chat_id={:?}, topic_len={}",
            request.chat_id,
            request.topic.len()
        );

        let response = self
            .client
            .post(self.url("/generate-blog"))
            .json(request)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(network_error)?;
        debug!("Generate response: status={}, {} bytes", status, body.len());

        // The backend reports generation failures as HTTP 500 with a
        // `detail` body; those are outcomes, not transport errors.
        match serde_json::from_str::<GenerateResponse>(&body) {
            Ok(parsed) if status.is_success() || parsed.detail.is_some() => parsed.into_outcome(),
            Err(e) if status.is_success() => Err(ApiError::Parse(e.to_string())),
            _ => {
                warn!("Generate failed: {} - {}", status, body);
                Err(ApiError::Api {
                    status: status.as_u16(),
                    message: error_message(status, &body),
                })
            }
        }
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>, ApiError> {
        debug!("GET /blogs?user_id={}", self.user_id);
        let response = self
            .send(
                self.client
                    .get(self.url("/blogs"))
                    .query(&[("user_id", self.user_id)]),
            )
            .await?;
        let blogs: Vec<Blog> = read_json(response).await?;
        info!("Loaded {} blogs", blogs.len());
        Ok(blogs)
    }
}
