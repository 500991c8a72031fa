//! # Application State
//!
//! Core workspace state for Blogforge. Domain logic only, no TUI types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: SessionRef           // Unsaved or Saved(chat_id)
//! ├── thread: Thread                // messages of the active session
//! ├── chats: ChatList               // sidebar list from GET /chats
//! ├── phase: Phase                  // Idle or Busy{ticket}
//! ├── settings: GenerationSettings  // tone/audience/length/keywords
//! ├── user_id: i64                  // sent with every generation
//! ├── status_message: String        // status bar text
//! ├── error: Option<String>         // last surfaced failure
//! ├── loading_messages: bool        // a session fetch is in flight
//! └── next_ticket: u64              // generation ticket counter
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::chats::ChatList;
use crate::core::config::ResolvedConfig;
use crate::core::generation::GenerationSettings;
use crate::core::thread::Thread;

/// Which session the thread belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionRef {
    /// Fresh session; the backend creates a chat on the first generation.
    #[default]
    Unsaved,
    Saved(i64),
}

impl SessionRef {
    pub fn chat_id(self) -> Option<i64> {
        match self {
            SessionRef::Unsaved => None,
            SessionRef::Saved(id) => Some(id),
        }
    }
}

/// Generation phase. A failed generation lands back in `Idle` with
/// `App::error` set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// One generation in flight; only results carrying this ticket apply.
    Busy { ticket: u64 },
}

pub struct App {
    pub session: SessionRef,
    pub thread: Thread,
    pub chats: ChatList,
    pub phase: Phase,
    pub settings: GenerationSettings,
    pub user_id: i64,
    pub status_message: String,
    pub error: Option<String>,
    pub loading_messages: bool,
    next_ticket: u64,
}

impl App {
    pub fn new(user_id: i64, settings: GenerationSettings) -> Self {
        Self {
            session: SessionRef::Unsaved,
            thread: Thread::new(),
            chats: ChatList::new(),
            phase: Phase::Idle,
            settings,
            user_id,
            status_message: String::from("Welcome to Blogforge!"),
            error: None,
            loading_messages: false,
            next_ticket: 0,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.user_id, config.settings.clone())
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Busy { .. })
    }

    /// The ticket of the in-flight generation, if any.
    pub fn active_ticket(&self) -> Option<u64> {
        match self.phase {
            Phase::Busy { ticket } => Some(ticket),
            Phase::Idle => None,
        }
    }

    /// Hands out a ticket that has never been used before.
    pub(crate) fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }
}
