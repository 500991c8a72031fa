//! # Chat List Store
//!
//! The sidebar's view of the backend's chats. Always replaced wholesale
//! from `GET /chats`, except for deletes, which remove the entry locally
//! once the backend has confirmed.

use crate::api::Chat;

#[derive(Debug, Default)]
pub struct ChatList {
    chats: Vec<Chat>,
    /// False until the first successful load.
    loaded: bool,
}

impl ChatList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, chats: Vec<Chat>) {
        self.chats = chats;
        self.loaded = true;
    }

    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.chats.len();
        self.chats.retain(|c| c.id != id);
        before != self.chats.len()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.chats.iter().any(|c| c.id == id)
    }

    pub fn get(&self, id: i64) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id == id)
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}
