//! Test doubles for the durable backend and generation ports.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use solace_types::error::{BackendError, GenerationError};
use solace_types::message::{HistoryEntry, Message, MessageId, NewMessage};

use crate::generation::generator::Generator;
use crate::store::durable::DurableBackend;

/// Durable double backed by a Vec. Can be switched "offline" to simulate an
/// outage; ids are prefixed with `d` so they never collide with ephemeral ids.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    rows: Arc<Mutex<Vec<Message>>>,
    next_id: Arc<AtomicU64>,
    offline: Arc<AtomicBool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<Message> {
        self.rows.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

impl DurableBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn insert(&self, message: &NewMessage) -> Result<Message, BackendError> {
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let saved = message
            .clone()
            .into_message(MessageId(format!("d{id}")), Utc::now());
        self.rows.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn query_by_session(&self, session_id: &str) -> Result<Vec<Message>, BackendError> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn delete_by_session(&self, session_id: &str) -> Result<(), BackendError> {
        self.check()?;
        self.rows
            .lock()
            .unwrap()
            .retain(|m| m.session_id != session_id);
        Ok(())
    }
}

/// Durable double that never answers within any reasonable timeout.
pub struct StalledBackend;

impl DurableBackend for StalledBackend {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn insert(&self, _message: &NewMessage) -> Result<Message, BackendError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(BackendError::Unavailable("unreachable".to_string()))
    }

    async fn query_by_session(&self, _session_id: &str) -> Result<Vec<Message>, BackendError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }

    async fn delete_by_session(&self, _session_id: &str) -> Result<(), BackendError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

/// Generator double that records the history it was given.
#[derive(Clone, Default)]
pub struct RecordingGenerator {
    pub calls: Arc<Mutex<Vec<(String, Vec<HistoryEntry>)>>>,
}

impl RecordingGenerator {
    pub fn last_history(&self) -> Vec<HistoryEntry> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|(_, history)| history.clone())
            .unwrap_or_default()
    }
}

impl Generator for RecordingGenerator {
    fn name(&self) -> &str {
        "recording"
    }

    async fn generate(
        &self,
        utterance: &str,
        history: &[HistoryEntry],
    ) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((utterance.to_string(), history.to_vec()));
        Ok(format!("echo: {utterance}"))
    }
}

/// Generator double that always fails.
pub struct FailingGenerator;

impl Generator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(
        &self,
        _utterance: &str,
        _history: &[HistoryEntry],
    ) -> Result<String, GenerationError> {
        Err(GenerationError::Provider("upstream returned 500".to_string()))
    }
}

/// Generator double that hangs past any timeout.
pub struct StalledGenerator;

impl Generator for StalledGenerator {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn generate(
        &self,
        _utterance: &str,
        _history: &[HistoryEntry],
    ) -> Result<String, GenerationError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok("too late".to_string())
    }
}

/// Generator double that "succeeds" with whitespace only.
pub struct BlankGenerator;

impl Generator for BlankGenerator {
    fn name(&self) -> &str {
        "blank"
    }

    async fn generate(
        &self,
        _utterance: &str,
        _history: &[HistoryEntry],
    ) -> Result<String, GenerationError> {
        Ok("  \n".to_string())
    }
}
