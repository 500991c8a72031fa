//! # Core Application Logic
//!
//! The workspace's business logic: sessions, the message thread and the
//! generation cycle. It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • effects (I/O runner) │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │  Backend   │
//!     │  Adapter   │                          │ (api mod)  │
//!     │ (ratatui)  │                          │            │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all workspace state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`effects`]: Runs an `Effect` against a `Backend`
//! - [`thread`]: Messages of the active session
//! - [`chats`]: The sidebar's chat list
//! - [`generation`]: Tone/audience/length settings and request building
//! - [`config`]: Layered configuration
//! - [`archive`]: Text rendering of the blog archive

pub mod action;
pub mod archive;
pub mod chats;
pub mod config;
pub mod effects;
pub mod generation;
pub mod state;
pub mod thread;
