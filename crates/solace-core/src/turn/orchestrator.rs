//! Turn orchestrator: one user utterance in, two persisted messages out.
//!
//! The pipeline is fixed and sequential:
//!
//! 1. validate the utterance (the only hard failure)
//! 2. persist the user message
//! 3. read the session history and keep the most recent window
//! 4. generate a reply (default reply on failure or timeout)
//! 5. persist the bot message
//! 6. return both messages in creation order
//!
//! Concurrent turns on the same session are not serialized; their messages
//! interleave in whatever order the store writes complete.

use std::time::Duration;

use solace_types::config::{ServiceConfig, DEFAULT_HISTORY_WINDOW};
use solace_types::error::{GenerationError, StoreError};
use solace_types::message::{
    validate_session_id, validate_utterance, HistoryEntry, Message, NewMessage,
    MAX_CONTENT_CHARS,
};
use tracing::{debug, info, warn};

use crate::generation::generator::Generator;
use crate::store::durable::DurableBackend;
use crate::store::session::SessionMessageStore;

/// Reply persisted when generation fails, times out, or returns nothing.
pub const DEFAULT_REPLY: &str = "I'm here to listen and support you, and I want you to know \
that your feelings matter. Could you tell me a bit more about how you're feeling right now?";

/// Default bound on a single generation call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for the turn pipeline.
#[derive(Debug, Clone)]
pub struct TurnPolicy {
    /// Most recent prior messages passed to the generator.
    pub history_window: usize,
    /// Maximum characters accepted in a user utterance.
    pub max_content_chars: usize,
    pub generation_timeout: Duration,
}

impl Default for TurnPolicy {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            max_content_chars: MAX_CONTENT_CHARS,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }
}

impl TurnPolicy {
    /// Build a policy from config. The history window and content limit are
    /// upper bounds: larger configured values are clamped with a warning.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            history_window: clamp_setting(
                "history_window",
                config.history_window,
                DEFAULT_HISTORY_WINDOW,
            ),
            max_content_chars: clamp_setting(
                "max_content_chars",
                config.max_content_chars,
                MAX_CONTENT_CHARS,
            ),
            generation_timeout: Duration::from_millis(config.generation.timeout_ms),
        }
    }
}

fn clamp_setting(setting: &str, configured: usize, max: usize) -> usize {
    if configured > max {
        warn!(setting, configured, max, "Configured value exceeds limit, clamping");
        return max;
    }
    configured
}

/// The two messages produced by one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub user: Message,
    pub bot: Message,
}

impl Turn {
    /// Both messages in creation order (user, then bot).
    pub fn into_messages(self) -> [Message; 2] {
        [self.user, self.bot]
    }
}

/// Drives persistence and generation for each conversational turn.
///
/// Generic over `DurableBackend` and `Generator` so the core never depends
/// on solace-infra. Share it behind an `Arc`; each call is independent.
pub struct TurnOrchestrator<D: DurableBackend, G: Generator> {
    store: SessionMessageStore<D>,
    generator: G,
    policy: TurnPolicy,
}

impl<D: DurableBackend, G: Generator> TurnOrchestrator<D, G> {
    pub fn new(store: SessionMessageStore<D>, generator: G, policy: TurnPolicy) -> Self {
        Self {
            store,
            generator,
            policy,
        }
    }

    /// Access the message store.
    pub fn store(&self) -> &SessionMessageStore<D> {
        &self.store
    }

    /// Access the generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn policy(&self) -> &TurnPolicy {
        &self.policy
    }

    /// Run one turn. Valid input always yields exactly two messages.
    pub async fn submit_turn(&self, session_id: &str, user_text: &str) -> Result<Turn, StoreError> {
        validate_session_id(session_id)?;
        validate_utterance(user_text, self.policy.max_content_chars)?;

        let user = self
            .store
            .create(NewMessage::user(session_id, user_text))
            .await?;

        let history = self.recent_history(session_id, &user).await?;
        let reply = self.generate_reply(session_id, user_text, &history).await;

        let bot = self.store.create(NewMessage::bot(session_id, reply)).await?;

        info!(
            session_id,
            user_message_id = %user.id,
            bot_message_id = %bot.id,
            history_len = history.len(),
            "Turn completed"
        );

        Ok(Turn { user, bot })
    }

    /// Ordered history of a session.
    pub async fn get_history(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        self.store.list_by_session(session_id).await
    }

    /// Remove every message of a session.
    pub async fn clear_session(&self, session_id: &str) -> Result<(), StoreError> {
        self.store.clear_session(session_id).await?;
        info!(session_id, "Session cleared");
        Ok(())
    }

    /// The most recent prior messages, excluding the one just written.
    async fn recent_history(
        &self,
        session_id: &str,
        current: &Message,
    ) -> Result<Vec<HistoryEntry>, StoreError> {
        let prior: Vec<Message> = self
            .store
            .list_by_session(session_id)
            .await?
            .into_iter()
            .filter(|m| !is_same_record(m, current))
            .collect();

        let skip = prior.len().saturating_sub(self.policy.history_window);
        Ok(prior[skip..].iter().map(HistoryEntry::from).collect())
    }

    async fn generate_reply(
        &self,
        session_id: &str,
        utterance: &str,
        history: &[HistoryEntry],
    ) -> String {
        let timeout = self.policy.generation_timeout;
        let outcome = match tokio::time::timeout(
            timeout,
            self.generator.generate(utterance, history),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(timeout.as_millis() as u64)),
        };

        match outcome {
            Ok(reply) if !reply.trim().is_empty() => {
                debug!(session_id, generator = self.generator.name(), "Reply generated");
                reply
            }
            Ok(_) => {
                warn!(
                    session_id,
                    generator = self.generator.name(),
                    error = %GenerationError::EmptyReply,
                    "Generation failed, using default reply"
                );
                DEFAULT_REPLY.to_string()
            }
            Err(err) => {
                warn!(
                    session_id,
                    generator = self.generator.name(),
                    error = %err,
                    "Generation failed, using default reply"
                );
                DEFAULT_REPLY.to_string()
            }
        }
    }
}

/// Ids are only unique per store, so match on the whole record.
fn is_same_record(a: &Message, b: &Message) -> bool {
    a.id == b.id && a.sender == b.sender && a.content == b.content
}
