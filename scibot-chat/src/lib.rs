//! Chat engine for scibot
//!
//! Mediates every exchange between a session's turn log and the model
//! gateway so the two never diverge, and projects session history into
//! a display list for the UI layer.

pub mod engine;
pub mod projector;

pub use engine::{ChatEngine, ChatError};
pub use projector::{project, DisplayLine, Speaker};
