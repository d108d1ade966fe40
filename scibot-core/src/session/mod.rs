//! Session management for conversation history
//!
//! A session is the ordered, append-only log of turns for one UI session,
//! together with the handle identifying the remote conversation context.

pub mod manager;
pub mod store;

pub use manager::SessionManager;
pub use store::{Role, Session, SessionPhase, Turn};
