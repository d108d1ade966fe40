//! Session data structures and the exchange state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human on the near side of the conversation
    User,
    /// The remote generative model
    Model,
}

/// One utterance in a conversation
///
/// Immutable once committed to a session; the text of a committed turn
/// is never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Who said it
    pub role: Role,
    /// What was said
    pub text: String,
    /// When the turn was committed
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Create a new turn
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Where a session is in its exchange cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No context handle bound yet; nothing exchanged
    Empty,
    /// Context bound; ready for the next user message
    Active,
    /// A user turn is committed and the gateway call is in flight
    AwaitingResponse,
    /// The last exchange failed; its user turn remains unanswered
    ErrorPendingRetry,
}

/// A conversation session
///
/// The turn log is append-only: turns are never removed or reordered
/// within a session's lifetime. Turns alternate user/model, except that a
/// failed exchange leaves an unanswered user turn behind, so consecutive
/// user turns can occur across a retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session key
    id: String,
    /// Committed turns, in insertion order
    turns: Vec<Turn>,
    /// Opaque handle to the remote conversation context
    context: Option<String>,
    /// Exchange cycle state
    phase: SessionPhase,
    /// Session creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new, empty session
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            turns: Vec::new(),
            context: None,
            phase: SessionPhase::Empty,
            created_at: now,
            updated_at: now,
        }
    }

    /// Session key
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current exchange cycle state
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The bound remote context handle, if any
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Committed turns in insertion order
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    /// Bind the remote context handle.
    ///
    /// A handle is bound at most once per session: rebinding while turns
    /// exist would desynchronize the remote model's memory from the local
    /// log, so a second bind is an error.
    pub fn bind_context(&mut self, handle: impl Into<String>) -> crate::Result<()> {
        if self.context.is_some() {
            return Err(crate::Error::Session(format!(
                "session {} already has a context handle",
                self.id
            )));
        }
        self.context = Some(handle.into());
        if self.phase == SessionPhase::Empty {
            self.phase = SessionPhase::Active;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Commit a user turn and mark the gateway call as in flight.
    ///
    /// Requires a bound context and no exchange already in flight. The
    /// previous exchange may have failed; its unanswered user turn stays
    /// and this one is committed after it.
    pub fn begin_exchange(&mut self, text: &str) -> crate::Result<&Turn> {
        let text = text.trim();
        if text.is_empty() {
            return Err(crate::Error::Validation(
                "user message is empty".to_string(),
            ));
        }
        if self.context.is_none() {
            return Err(crate::Error::Session(format!(
                "session {} has no context handle",
                self.id
            )));
        }
        if self.phase == SessionPhase::AwaitingResponse {
            return Err(crate::Error::Session(format!(
                "session {} already has an exchange in flight",
                self.id
            )));
        }

        self.turns.push(Turn::new(Role::User, text));
        self.phase = SessionPhase::AwaitingResponse;
        self.updated_at = Utc::now();
        Ok(self.turns.last().expect("turn just pushed"))
    }

    /// Commit the model's reply for the exchange in flight
    pub fn complete_exchange(&mut self, reply: &str) -> crate::Result<&Turn> {
        if self.phase != SessionPhase::AwaitingResponse {
            return Err(crate::Error::Session(format!(
                "session {} has no exchange in flight",
                self.id
            )));
        }
        if reply.trim().is_empty() {
            return Err(crate::Error::Validation(
                "model reply is empty".to_string(),
            ));
        }

        self.turns.push(Turn::new(Role::Model, reply));
        self.phase = SessionPhase::Active;
        self.updated_at = Utc::now();
        Ok(self.turns.last().expect("turn just pushed"))
    }

    /// Record that the exchange in flight failed.
    ///
    /// The unanswered user turn stays in the log; the session accepts a
    /// new exchange afterwards. No effect unless an exchange is in flight.
    pub fn fail_exchange(&mut self) {
        if self.phase == SessionPhase::AwaitingResponse {
            self.phase = SessionPhase::ErrorPendingRetry;
            self.updated_at = Utc::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_session() -> Session {
        let mut session = Session::new("cli:test");
        session.bind_context("ctx-1").unwrap();
        session
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new("cli:test");
        assert_eq!(session.id(), "cli:test");
        assert!(session.history().is_empty());
        assert!(session.context().is_none());
        assert_eq!(session.phase(), SessionPhase::Empty);
    }

    #[test]
    fn test_bind_context_once() {
        let mut session = Session::new("cli:test");
        session.bind_context("ctx-1").unwrap();
        assert_eq!(session.context(), Some("ctx-1"));
        assert_eq!(session.phase(), SessionPhase::Active);

        let err = session.bind_context("ctx-2").unwrap_err();
        assert!(err.to_string().contains("already has a context handle"));
        assert_eq!(session.context(), Some("ctx-1"));
    }

    #[test]
    fn test_successful_exchange_alternates_roles() {
        let mut session = bound_session();

        session.begin_exchange("Why is the sky blue?").unwrap();
        assert_eq!(session.phase(), SessionPhase::AwaitingResponse);

        session
            .complete_exchange("Because of Rayleigh scattering...")
            .unwrap();
        assert_eq!(session.phase(), SessionPhase::Active);

        let turns = session.history();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].text, "Why is the sky blue?");
        assert_eq!(turns[1].role, Role::Model);
        assert_eq!(turns[1].text, "Because of Rayleigh scattering...");
    }

    #[test]
    fn test_failed_exchange_keeps_user_turn() {
        let mut session = bound_session();

        session.begin_exchange("What is gravity?").unwrap();
        session.fail_exchange();

        assert_eq!(session.phase(), SessionPhase::ErrorPendingRetry);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].role, Role::User);
    }

    #[test]
    fn test_retry_after_failure_tolerates_consecutive_user_turns() {
        let mut session = bound_session();

        session.begin_exchange("What is gravity?").unwrap();
        session.fail_exchange();

        session.begin_exchange("Gravity?").unwrap();
        session.complete_exchange("A force of attraction.").unwrap();

        let roles: Vec<Role> = session.history().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::User, Role::Model]);
    }

    #[test]
    fn test_begin_exchange_rejects_empty_text() {
        let mut session = bound_session();

        assert!(session.begin_exchange("").is_err());
        assert!(session.begin_exchange("   ").is_err());
        assert!(session.history().is_empty());
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn test_begin_exchange_requires_context() {
        let mut session = Session::new("cli:test");
        let err = session.begin_exchange("Hello").unwrap_err();
        assert!(err.to_string().contains("no context handle"));
    }

    #[test]
    fn test_begin_exchange_rejects_overlapping_calls() {
        let mut session = bound_session();
        session.begin_exchange("first").unwrap();

        let err = session.begin_exchange("second").unwrap_err();
        assert!(err.to_string().contains("in flight"));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_begin_exchange_trims_text() {
        let mut session = bound_session();
        session.begin_exchange("  What is light?  ").unwrap();
        assert_eq!(session.history()[0].text, "What is light?");
    }

    #[test]
    fn test_complete_exchange_requires_in_flight_call() {
        let mut session = bound_session();
        assert!(session.complete_exchange("reply").is_err());
    }
}
