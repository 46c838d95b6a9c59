//! Conversation manager
//!
//! Orchestrates one turn of the assistant conversation: rebuild the system
//! context from a task store snapshot, append the user message, drive the
//! streaming completion while republishing live display text, then parse
//! and execute any action blocks the finished response carried.

use std::sync::Arc;

use chrono::Local;
use eyre::{Result, WrapErr};
use planstore::TaskStore;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::actions::parse_action;
use super::blocks::{extract_action_blocks, strip_action_blocks};
use super::context::render_system_prompt;
use super::executor::apply_action;
use crate::llm::{ChatMessage, LlmClient, Role};

/// Phases a turn moves through, traced for debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnPhase {
    BuildingContext,
    Streaming,
    Finalizing,
    Failed,
}

/// What one completed turn produced
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// Response text with every action block stripped, safe to render
    pub display_text: String,
    /// One line per applied mutation, in application order
    pub confirmations: Vec<String>,
}

/// The assistant conversation and its turn pipeline
///
/// Owns the message history for its lifetime. `send_message` takes `&mut
/// self`, so two turns can never be in flight against the same conversation.
pub struct ChatService {
    llm: Arc<dyn LlmClient>,
    history: Vec<ChatMessage>,
}

impl ChatService {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            history: Vec::new(),
        }
    }

    /// The conversation so far, system message included
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Forget the conversation; the next turn starts fresh
    pub fn reset(&mut self) {
        debug!(dropped = self.history.len(), "reset: clearing history");
        self.history.clear();
    }

    /// Run one full turn
    ///
    /// Live display text (the accumulated response with action blocks
    /// stripped) is republished on `display_tx` after every fragment. Actions
    /// are only derived once the stream has been fully consumed, so a failed
    /// or cancelled turn applies none; either way the user message is rolled
    /// back off the history so the turn can be retried without duplication.
    pub async fn send_message(
        &mut self,
        store: &mut dyn TaskStore,
        user_message: &str,
        display_tx: mpsc::Sender<String>,
    ) -> Result<TurnOutcome> {
        debug!(phase = ?TurnPhase::BuildingContext, "send_message: turn started");
        let snapshot = store.list();
        let system = render_system_prompt(&snapshot, Local::now())?;
        match self.history.first() {
            Some(first) if first.role == Role::System => self.history[0] = ChatMessage::system(system),
            _ => self.history.insert(0, ChatMessage::system(system)),
        }

        let llm = Arc::clone(&self.llm);
        let mut guard = RollbackGuard::arm(&mut self.history);
        guard.history.push(ChatMessage::user(user_message));
        let messages = guard.history.clone();

        debug!(phase = ?TurnPhase::Streaming, message_count = messages.len(), "send_message: opening stream");
        let (frag_tx, mut frag_rx) = mpsc::channel::<String>(64);
        let publisher = tokio::spawn(async move {
            let mut buffer = String::new();
            while let Some(fragment) = frag_rx.recv().await {
                buffer.push_str(&fragment);
                let _ = display_tx.send(strip_action_blocks(&buffer)).await;
            }
        });

        // frag_tx moves into the call; the channel closes when the stream
        // ends, which is what stops the publisher
        let response = llm.chat_stream(messages, frag_tx).await;
        let _ = publisher.await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!(phase = ?TurnPhase::Failed, error = %e, "send_message: transport failed, rolling back");
                return Err(e).wrap_err("Chat completion failed");
            }
        };

        debug!(phase = ?TurnPhase::Finalizing, chars = response.len(), "send_message: stream complete");
        guard.history.push(ChatMessage::assistant(response.clone()));
        guard.commit();

        let display_text = strip_action_blocks(&response);
        let mut confirmations = Vec::new();
        for payload in extract_action_blocks(&response) {
            let Some(action) = parse_action(&payload) else {
                continue;
            };
            confirmations.extend(apply_action(store, action));
        }

        info!(applied = confirmations.len(), "send_message: turn complete");
        Ok(TurnOutcome {
            display_text,
            confirmations,
        })
    }
}

/// Undoes the user-message append unless the turn commits
///
/// Held across the stream await, so a dropped (cancelled) turn restores the
/// history exactly like a failed one.
struct RollbackGuard<'a> {
    history: &'a mut Vec<ChatMessage>,
    restore_len: usize,
    committed: bool,
}

impl<'a> RollbackGuard<'a> {
    fn arm(history: &'a mut Vec<ChatMessage>) -> Self {
        let restore_len = history.len();
        Self {
            history,
            restore_len,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for RollbackGuard<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.history.truncate(self.restore_len);
        }
    }
}
