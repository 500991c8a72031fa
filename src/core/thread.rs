//! # Message Thread
//!
//! The ordered messages of the active session, plus the transient
//! "generating" placeholder.
//!
//! Each message carries a client-side `key` that never changes and is never
//! reused, and an `id` that is `None` until the backend has persisted it.
//! Keys let asynchronous results (deletes, edits) find their message even
//! after the thread has changed underneath them.
//!
//! ```text
//! [user  #5 ] "Future of Agentic AI"
//! [asst  #6 ] "# The Future..."
//! [user  -- ] "Follow-up topic"      ← optimistic, id = None
//! ( generating… )                    ← placeholder, not a message
//! ```

use chrono::{NaiveDateTime, Utc};

use crate::api::{self, Role};

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadMessage {
    /// Stable client-side identity.
    pub key: u64,
    /// Backend id; `None` while optimistic.
    pub id: Option<i64>,
    pub role: Role,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
}

impl ThreadMessage {
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// A message targeted by a delete, identified both ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteTarget {
    pub key: u64,
    pub id: Option<i64>,
}

/// What one confirmed delete removes: the chosen message and, for a user
/// message, the assistant reply directly after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletePlan {
    pub primary: DeleteTarget,
    pub cascade: Option<DeleteTarget>,
}

impl DeletePlan {
    /// True when nothing in the plan exists on the backend.
    pub fn is_local_only(&self) -> bool {
        self.primary.id.is_none() && self.cascade.is_none_or(|c| c.id.is_none())
    }

    pub fn keys(&self) -> Vec<u64> {
        std::iter::once(self.primary.key)
            .chain(self.cascade.map(|c| c.key))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct Thread {
    messages: Vec<ThreadMessage>,
    loading: bool,
    next_key: u64,
}

impl Thread {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ThreadMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Empty means the welcome screen is shown.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && !self.loading
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn get(&self, key: u64) -> Option<&ThreadMessage> {
        self.messages.iter().find(|m| m.key == key)
    }

    pub fn position(&self, key: u64) -> Option<usize> {
        self.messages.iter().position(|m| m.key == key)
    }

    fn alloc_key(&mut self) -> u64 {
        self.next_key += 1;
        self.next_key
    }

    fn push(
        &mut self,
        id: Option<i64>,
        role: Role,
        content: String,
        image_url: Option<String>,
        created_at: NaiveDateTime,
    ) -> u64 {
        let key = self.alloc_key();
        self.messages.push(ThreadMessage {
            key,
            id,
            role,
            content,
            image_url,
            created_at,
        });
        key
    }

    /// Drops everything, including the placeholder. Keys keep counting.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.loading = false;
    }

    /// Replaces the thread with a session's persisted messages.
    pub fn replace_with(&mut self, messages: Vec<api::Message>) {
        self.clear();
        for msg in messages {
            self.push(
                Some(msg.id),
                msg.role,
                msg.content,
                msg.image_url,
                msg.created_at,
            );
        }
    }

    /// Appends a not-yet-persisted user message.
    pub fn push_optimistic_user(&mut self, content: String) -> u64 {
        self.push(None, Role::User, content, None, Utc::now().naive_utc())
    }

    /// Appends an assistant message. `id: None` is used for synthetic error
    /// messages that never reach the backend.
    pub fn push_assistant(
        &mut self,
        id: Option<i64>,
        content: String,
        image_url: Option<String>,
    ) -> u64 {
        self.push(id, Role::Assistant, content, image_url, Utc::now().naive_utc())
    }

    pub fn show_loading(&mut self) {
        self.loading = true;
    }

    pub fn remove_loading(&mut self) {
        self.loading = false;
    }

    /// Assigns `id` to the most recent unpersisted user message. Only one
    /// generation is ever in flight, so that message is the one just sent.
    pub fn reconcile_latest_user(&mut self, id: i64) -> bool {
        match self
            .messages
            .iter_mut()
            .rev()
            .find(|m| m.role == Role::User && !m.is_persisted())
        {
            Some(msg) => {
                msg.id = Some(id);
                true
            }
            None => false,
        }
    }

    /// Works out what deleting `key` removes.
    pub fn plan_delete(&self, key: u64) -> Option<DeletePlan> {
        let idx = self.position(key)?;
        let target = &self.messages[idx];
        let cascade = match target.role {
            Role::User => self
                .messages
                .get(idx + 1)
                .filter(|next| next.role == Role::Assistant)
                .map(|next| DeleteTarget {
                    key: next.key,
                    id: next.id,
                }),
            Role::Assistant => None,
        };
        Some(DeletePlan {
            primary: DeleteTarget {
                key: target.key,
                id: target.id,
            },
            cascade,
        })
    }

    /// Removes messages by key; unknown keys are ignored. Returns how many
    /// were removed.
    pub fn remove_keys(&mut self, keys: &[u64]) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| !keys.contains(&m.key));
        before - self.messages.len()
    }

    /// Replaces a message's text. Returns the backend id (if any) on success.
    pub fn set_content(&mut self, key: u64, content: String) -> Option<Option<i64>> {
        let msg = self.messages.iter_mut().find(|m| m.key == key)?;
        msg.content = content;
        Some(msg.id)
    }
}
