//! Chat engine: the session/gateway mediator

use scibot_core::session::{SessionManager, SessionPhase, Turn};
use scibot_providers::{
    ContextHandle, GatewayError, GenerationConfig, ModelGateway, SafetySetting,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Error type for chat operations
#[derive(Error, Debug)]
pub enum ChatError {
    /// Input was empty after trimming; nothing was sent or recorded
    #[error("message is empty")]
    EmptyInput,

    /// The model gateway failed; a committed user turn stays unanswered
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The gateway call exceeded the configured deadline
    #[error("model gateway timed out after {0:?}")]
    Timeout(Duration),

    /// Session bookkeeping error
    #[error(transparent)]
    Session(#[from] scibot_core::Error),
}

/// Mediates every exchange between sessions and the model gateway.
///
/// One exchange is in flight at a time: session state is held behind an
/// async mutex for the duration of a submit, and the UI layer is expected
/// to suspend input until the call resolves. Overlapping submits on the
/// same session are unsupported; cancellation is unsupported.
pub struct ChatEngine {
    gateway: Arc<dyn ModelGateway>,
    sessions: Mutex<SessionManager>,
    system_instruction: String,
    generation: GenerationConfig,
    safety: Vec<SafetySetting>,
    reply_timeout: Duration,
}

impl ChatEngine {
    /// Create a new chat engine
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        system_instruction: impl Into<String>,
        generation: GenerationConfig,
        safety: Vec<SafetySetting>,
        reply_timeout: Duration,
    ) -> Self {
        Self {
            gateway,
            sessions: Mutex::new(SessionManager::new()),
            system_instruction: system_instruction.into(),
            generation,
            safety,
            reply_timeout,
        }
    }

    /// Submit one user message and return the model's turn.
    ///
    /// Creates the session on first use and binds its remote context
    /// lazily, once, before the first user turn is committed. On gateway
    /// failure the committed user turn is not rolled back; the session is
    /// left awaiting a retry and the error is returned for the UI to show
    /// in place of a reply.
    pub async fn submit(&self, session_id: &str, user_text: &str) -> Result<Turn, ChatError> {
        let text = user_text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_or_create(session_id);

        let handle = if let Some(bound) = session.context() {
            ContextHandle::new(bound)
        } else {
            // A context-creation failure leaves the session without turns;
            // the next submit simply tries again.
            let handle = self
                .gateway
                .create_context(&self.system_instruction, &self.generation, &self.safety)
                .await?;
            session.bind_context(handle.as_str())?;
            debug!(session_id, %handle, "conversation context bound");
            handle
        };

        session.begin_exchange(text)?;

        let outcome =
            tokio::time::timeout(self.reply_timeout, self.gateway.send_message(&handle, text))
                .await;

        match outcome {
            Ok(Ok(reply)) => match session.complete_exchange(&reply) {
                Ok(turn) => Ok(turn.clone()),
                Err(e) => {
                    session.fail_exchange();
                    Err(e.into())
                }
            },
            Ok(Err(e)) => {
                warn!(session_id, error = %e, "exchange failed");
                session.fail_exchange();
                Err(e.into())
            }
            Err(_) => {
                warn!(session_id, timeout = ?self.reply_timeout, "exchange timed out");
                session.fail_exchange();
                Err(ChatError::Timeout(self.reply_timeout))
            }
        }
    }

    /// Session history in insertion order; empty for an unknown session
    pub async fn history(&self, session_id: &str) -> Vec<Turn> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(session_id)
            .map(|session| session.history().to_vec())
            .unwrap_or_default()
    }

    /// Current phase of a session, if it exists
    pub async fn phase(&self, session_id: &str) -> Option<SessionPhase> {
        let sessions = self.sessions.lock().await;
        sessions.get(session_id).map(|session| session.phase())
    }

    /// Discard a session at the end of its UI lifetime
    pub async fn discard(&self, session_id: &str) -> bool {
        self.sessions.lock().await.remove(session_id).is_some()
    }
}
