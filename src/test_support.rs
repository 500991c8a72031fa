//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::api::{
    ApiError, Backend, Blog, Chat, GenerateOutcome, GenerateRequest, GeneratedTurn, Message, Role,
};
use crate::core::generation::GenerationSettings;
use crate::core::state::App;

/// A backend call as recorded by [`MockBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListChats,
    GetMessages(i64),
    DeleteChat(i64),
    DeleteMessage(i64),
    UpdateMessage(i64, String),
    Generate(GenerateRequest),
    ListBlogs,
}

/// In-memory backend with scripted answers. Unscripted calls succeed with
/// empty results; an unscripted `generate` reports a connection error.
#[derive(Default)]
pub struct MockBackend {
    calls: Mutex<Vec<Call>>,
    chats: Mutex<Vec<Chat>>,
    messages: Mutex<HashMap<i64, Vec<Message>>>,
    generate: Mutex<VecDeque<Result<GenerateOutcome, ApiError>>>,
    delete_message_failures: Mutex<HashMap<i64, ApiError>>,
    update_failure: Mutex<Option<ApiError>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_chats(&self, chats: Vec<Chat>) {
        *self.chats.lock().unwrap() = chats;
    }

    pub fn set_messages(&self, chat_id: i64, messages: Vec<Message>) {
        self.messages.lock().unwrap().insert(chat_id, messages);
    }

    pub fn push_generate(&self, result: Result<GenerateOutcome, ApiError>) {
        self.generate.lock().unwrap().push_back(result);
    }

    pub fn fail_delete_message(&self, id: i64, error: ApiError) {
        self.delete_message_failures.lock().unwrap().insert(id, error);
    }

    pub fn fail_update(&self, error: ApiError) {
        *self.update_failure.lock().unwrap() = Some(error);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn base_url(&self) -> &str {
        "mock://backend"
    }

    async fn list_chats(&self) -> Result<Vec<Chat>, ApiError> {
        self.record(Call::ListChats);
        Ok(self.chats.lock().unwrap().clone())
    }

    async fn get_messages(&self, chat_id: i64) -> Result<Vec<Message>, ApiError> {
        self.record(Call::GetMessages(chat_id));
        Ok(self
            .messages
            .lock()
            .unwrap()
            .get(&chat_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_chat(&self, chat_id: i64) -> Result<(), ApiError> {
        self.record(Call::DeleteChat(chat_id));
        self.chats.lock().unwrap().retain(|c| c.id != chat_id);
        Ok(())
    }

    async fn delete_message(&self, message_id: i64) -> Result<(), ApiError> {
        self.record(Call::DeleteMessage(message_id));
        match self.delete_message_failures.lock().unwrap().get(&message_id) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn update_message(&self, message_id: i64, content: &str) -> Result<(), ApiError> {
        self.record(Call::UpdateMessage(message_id, content.to_string()));
        match self.update_failure.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateOutcome, ApiError> {
        self.record(Call::Generate(request.clone()));
        self.generate
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted response".into())))
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>, ApiError> {
        self.record(Call::ListBlogs);
        Ok(Vec::new())
    }
}

pub fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

pub fn chat(id: i64, title: &str) -> Chat {
    Chat {
        id,
        title: title.to_string(),
        created_at: fixed_time(),
    }
}

pub fn message(id: i64, role: Role, content: &str) -> Message {
    Message {
        id,
        role,
        content: content.to_string(),
        image_url: None,
        created_at: fixed_time(),
    }
}

/// A successful generation outcome.
pub fn turn(user_id: i64, assistant_id: i64, chat_id: i64, content: &str) -> GenerateOutcome {
    GenerateOutcome::Generated(GeneratedTurn {
        content: content.to_string(),
        image_url: None,
        user_message_id: user_id,
        assistant_message_id: assistant_id,
        chat_id,
    })
}

/// Creates a test App for user 1 with default settings.
pub fn test_app() -> App {
    App::new(1, GenerationSettings::default())
}
