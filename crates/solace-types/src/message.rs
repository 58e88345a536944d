//! Conversation message types for Solace.
//!
//! A conversation is a sequence of [`Message`]s grouped by an opaque session
//! id. Sessions have no record of their own: a session exists while at least
//! one message carries its id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Upper bound on message content, counted in characters (not bytes).
pub const MAX_CONTENT_CHARS: usize = 500;

/// Which party of the conversation wrote a message.
///
/// Durable adapters store this as a boolean `is_bot` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn is_bot(self) -> bool {
        matches!(self, Sender::Bot)
    }

    pub fn from_is_bot(is_bot: bool) -> Self {
        if is_bot { Sender::Bot } else { Sender::User }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// Identifier assigned by whichever store created the record.
///
/// Durable ids and ephemeral ids live in different namespaces, so two ids
/// are only comparable when they came from the same store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        MessageId(id.to_string())
    }
}

impl From<u64> for MessageId {
    fn from(id: u64) -> Self {
        MessageId(id.to_string())
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        MessageId(id)
    }
}

/// A persisted conversation message. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub sender: Sender,
    pub session_id: String,
    /// Assigned by the store at write time; the only ordering key.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn is_bot(&self) -> bool {
        self.sender.is_bot()
    }
}

/// A message that has not been written yet. Stores assign `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub content: String,
    pub sender: Sender,
    pub session_id: String,
}

impl NewMessage {
    pub fn user(session_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::User,
            session_id: session_id.into(),
        }
    }

    pub fn bot(session_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::Bot,
            session_id: session_id.into(),
        }
    }

    /// Structural checks every store write requires: a session id and some
    /// content. Length limits are the caller's concern.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_session_id(&self.session_id)?;
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        Ok(())
    }

    /// Materialize this draft with the id and timestamp a store assigned.
    pub fn into_message(self, id: MessageId, timestamp: DateTime<Utc>) -> Message {
        Message {
            id,
            content: self.content,
            sender: self.sender,
            session_id: self.session_id,
            timestamp,
        }
    }
}

/// One prior turn as replayed to the generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sender: Sender,
    pub content: String,
}

impl From<&Message> for HistoryEntry {
    fn from(message: &Message) -> Self {
        Self {
            sender: message.sender,
            content: message.content.clone(),
        }
    }
}

/// Reject blank session ids. The id is otherwise opaque.
pub fn validate_session_id(session_id: &str) -> Result<(), ValidationError> {
    if session_id.trim().is_empty() {
        return Err(ValidationError::MissingSessionId);
    }
    Ok(())
}

/// Validate user-supplied text before a turn starts.
pub fn validate_utterance(text: &str, max_chars: usize) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    let actual = text.chars().count();
    if actual > max_chars {
        return Err(ValidationError::ContentTooLong {
            max: max_chars,
            actual,
        });
    }
    Ok(())
}
