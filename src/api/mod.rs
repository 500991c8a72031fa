//! # Backend API
//!
//! Typed access to the blog-generation backend's REST surface.
//!
//! ```text
//! core::effects ──▶ dyn Backend ──▶ HttpBackend ──▶ reqwest ──▶ /api/...
//! ```
//!
//! The [`Backend`] trait is the seam: the TUI talks to [`HttpBackend`],
//! tests talk to a scripted in-memory implementation.

pub mod backend;
pub mod client;
pub mod types;

pub use backend::{ApiError, Backend};
pub use client::HttpBackend;
pub use types::{
    Blog, Chat, GenerateOutcome, GenerateRequest, GeneratedTurn, Message, Role,
};
