//! # TUI Components
//!
//! ## Component Architecture
//!
//! Components follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields:
//! - `TitleBar`: app name, status or error, backend address
//! - `Message`: one thread message
//! - `LandingPage`: welcome screen with topic suggestions
//! - `ConfirmDialog`: yes/no overlay for destructive operations
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state lives in `TuiState`; a transient wrapper borrows it each
//! frame. The state implements `EventHandler` and emits high-level events
//! that the event loop turns into core `Action`s:
//! - `InputBox`: topic entry and message editing
//! - `MessageListState` / `MessageList`: scrollable thread with selection
//! - `SidebarState` / `Sidebar`: session list
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs     (top status bar)
//! ├── sidebar.rs       (session list)
//! ├── landing.rs       (empty-session screen)
//! ├── message.rs       (single message renderer)
//! ├── message_list.rs  (scrollable thread)
//! ├── input_box.rs     (topic / edit input)
//! └── confirm.rs       (delete confirmation)
//! ```

pub mod confirm;
pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;
pub mod sidebar;
mod title_bar;

pub use confirm::{ConfirmDialog, ConfirmEvent, PendingConfirm};
pub use input_box::{InputBox, InputEvent};
pub use landing::LandingPage;
pub use message_list::{MessageList, MessageListEvent, MessageListState};
pub use sidebar::{Sidebar, SidebarAction, SidebarState};
pub use title_bar::TitleBar;
