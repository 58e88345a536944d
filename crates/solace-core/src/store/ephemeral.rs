//! In-process ephemeral message store.
//!
//! Holds messages for the lifetime of the process. Always available, never
//! shared across processes. All state sits behind one mutex that is only
//! held for the duration of an in-memory update, never across an `.await`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use solace_types::error::StoreError;
use solace_types::message::{Message, MessageId, NewMessage};
use tracing::error;

#[derive(Debug, Default)]
struct EphemeralState {
    /// Last id handed out; ids start at 1.
    last_id: u64,
    /// Timestamps never go backwards within this store.
    last_timestamp: Option<DateTime<Utc>>,
    /// Keyed by local id, so iteration order is insertion order.
    messages: BTreeMap<u64, Message>,
}

/// Lock-guarded in-memory message store.
///
/// Cloning is cheap and shares the underlying state, so one instance can be
/// created at startup and handed to every component that needs it.
#[derive(Debug, Clone, Default)]
pub struct EphemeralStore {
    inner: Arc<Mutex<EphemeralState>>,
}

impl EphemeralStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, EphemeralState>, StoreError> {
        self.inner.lock().map_err(|_| {
            error!("Ephemeral store lock poisoned");
            StoreError::Structural("ephemeral store lock poisoned".to_string())
        })
    }

    /// Store a message, assigning the next local id and a timestamp that is
    /// never earlier than the previous one.
    pub fn insert(&self, message: NewMessage) -> Result<Message, StoreError> {
        let mut state = self.lock()?;

        let id = state.last_id + 1;
        let now = Utc::now();
        let timestamp = match state.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };

        let message = message.into_message(MessageId::from(id), timestamp);
        state.last_id = id;
        state.last_timestamp = Some(timestamp);
        state.messages.insert(id, message.clone());

        Ok(message)
    }

    /// Messages of one session, ordered by timestamp then insertion order.
    pub fn list_by_session(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        let state = self.lock()?;
        let mut messages: Vec<Message> = state
            .messages
            .values()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect();
        drop(state);

        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    /// Remove every message of a session. Returns how many were removed.
    pub fn clear_session(&self, session_id: &str) -> Result<usize, StoreError> {
        let mut state = self.lock()?;
        let before = state.messages.len();
        state.messages.retain(|_, m| m.session_id != session_id);
        Ok(before - state.messages.len())
    }

    /// Total number of messages across all sessions.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.messages.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_types::message::Sender;

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = EphemeralStore::new();
        let first = store.insert(NewMessage::user("s1", "hello")).unwrap();
        let second = store.insert(NewMessage::bot("s1", "hi")).unwrap();

        assert_eq!(first.id.as_str(), "1");
        assert_eq!(second.id.as_str(), "2");
        assert!(second.timestamp >= first.timestamp);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_list_by_session_filters_and_orders() {
        let store = EphemeralStore::new();
        for i in 0..6 {
            let session = if i % 2 == 0 { "a" } else { "b" };
            store
                .insert(NewMessage::user(session, format!("msg {i}")))
                .unwrap();
        }

        let a = store.list_by_session("a").unwrap();
        let contents: Vec<&str> = a.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["msg 0", "msg 2", "msg 4"]);
        assert!(a.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

        assert!(store.list_by_session("missing").unwrap().is_empty());
    }

    #[test]
    fn test_clear_session_only_touches_that_session() {
        let store = EphemeralStore::new();
        store.insert(NewMessage::user("a", "one")).unwrap();
        store.insert(NewMessage::bot("a", "two")).unwrap();
        store.insert(NewMessage::user("b", "three")).unwrap();

        assert_eq!(store.clear_session("a").unwrap(), 2);
        assert!(store.list_by_session("a").unwrap().is_empty());
        assert_eq!(store.list_by_session("b").unwrap().len(), 1);

        // Clearing again is a no-op.
        assert_eq!(store.clear_session("a").unwrap(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let store = EphemeralStore::new();
        let other = store.clone();
        other.insert(NewMessage::user("s1", "shared")).unwrap();

        let messages = store.list_by_session("s1").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::User);
    }

    #[test]
    fn test_concurrent_inserts_get_unique_ids() {
        let store = EphemeralStore::new();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store
                            .insert(NewMessage::user(format!("s{t}"), format!("m{i}")))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len().unwrap(), 200);
        let ids: std::collections::HashSet<String> = (0..8)
            .flat_map(|t| store.list_by_session(&format!("s{t}")).unwrap())
            .map(|m| m.id.0)
            .collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_poisoned_lock_is_structural_error() {
        let store = EphemeralStore::new();
        let poisoner = store.clone();
        let result: std::thread::Result<()> = std::thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the ephemeral store");
        })
        .join();
        assert!(result.is_err());

        let err = store.insert(NewMessage::user("s1", "hello")).unwrap_err();
        assert!(matches!(err, StoreError::Structural(_)));
    }
}
