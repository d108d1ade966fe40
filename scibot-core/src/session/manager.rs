//! Session manager for handling multiple sessions
//!
//! Sessions live for the process lifetime only; there is no durable
//! storage. Discarding the manager discards every conversation.

use super::store::Session;
use std::collections::HashMap;

/// Manages conversation sessions
#[derive(Debug, Default)]
pub struct SessionManager {
    /// Sessions by key
    sessions: HashMap<String, Session>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Get or create a session.
    ///
    /// Idempotent: the first call for a key creates an empty session, every
    /// later call returns that same session. Callers never need to branch
    /// on first-call-vs-later-call.
    pub fn get_or_create(&mut self, id: impl Into<String>) -> &mut Session {
        let id = id.into();
        self.sessions
            .entry(id.clone())
            .or_insert_with(|| Session::new(id))
    }

    /// Get a session if it exists
    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    /// Discard a session, returning it if it existed
    pub fn remove(&mut self, id: &str) -> Option<Session> {
        self.sessions.remove(id)
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether any sessions are live
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
