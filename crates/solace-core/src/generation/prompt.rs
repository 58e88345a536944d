//! Prompt construction for chat-completion style generators.
//!
//! Produces provider-neutral messages: the system prompt first, then the
//! bounded history in chronological order, then the new utterance. Adapters
//! map these onto their own request types.

use solace_types::message::{HistoryEntry, Sender};

/// Role of a prompt message as understood by chat-completion APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

impl From<Sender> for PromptRole {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => PromptRole::User,
            Sender::Bot => PromptRole::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    fn new(role: PromptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Supportive-listener persona. The current utterance is quoted so the
/// model anchors on it even when history is long.
pub fn system_prompt(utterance: &str) -> String {
    format!(
        "You are Solace, a companion that offers empathetic emotional support \
through thoughtful, compassionate conversation.

Your role is to:
- Listen deeply and respond with genuine empathy
- Help the user process their emotions in a healthy way
- Suggest coping strategies and emotional tools when appropriate
- Keep a warm, supportive tone while being genuinely helpful

The user is sharing: \"{utterance}\"

Respond with authentic empathy and practical emotional support. Keep responses \
conversational but meaningful."
    )
}

/// Build the full message list for one generation call.
pub fn build_prompt(utterance: &str, history: &[HistoryEntry]) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(PromptMessage::new(PromptRole::System, system_prompt(utterance)));
    messages.extend(
        history
            .iter()
            .map(|entry| PromptMessage::new(entry.sender.into(), entry.content.clone())),
    );
    messages.push(PromptMessage::new(PromptRole::User, utterance));
    messages
}
