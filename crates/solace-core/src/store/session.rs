//! Session message store: one read/write/delete API over two stores.
//!
//! Every durable call, including timeouts and a missing backend, is reduced
//! to a `Result<T, BackendError>`. The fallback decision is made here, once
//! per operation, by matching on that result:
//!
//! | operation         | durable `Ok`              | durable `Err`           |
//! |-------------------|---------------------------|-------------------------|
//! | `create`          | durable record            | ephemeral write         |
//! | `list_by_session` | rows (ephemeral if empty) | ephemeral scan          |
//! | `clear_session`   | ephemeral also cleared    | ephemeral also cleared  |
//!
//! The two stores are never reconciled: a message written to the ephemeral
//! store during an outage stays there.

use std::future::Future;
use std::time::Duration;

use solace_types::error::{BackendError, StoreError};
use solace_types::message::{validate_session_id, Message, NewMessage};
use tracing::{debug, warn};

use super::durable::DurableBackend;
use super::ephemeral::EphemeralStore;

/// Default bound on a single durable backend call.
pub const DEFAULT_DURABLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Facade over the durable backend and the ephemeral store.
///
/// Never reports backend unavailability to the caller; only malformed input
/// (`StoreError::Validation`) or a broken ephemeral store
/// (`StoreError::Structural`) surface.
pub struct SessionMessageStore<D: DurableBackend> {
    durable: Option<D>,
    ephemeral: EphemeralStore,
    timeout: Duration,
}

impl<D: DurableBackend> SessionMessageStore<D> {
    /// Create a store that tries `durable` first.
    pub fn new(durable: D, ephemeral: EphemeralStore, timeout: Duration) -> Self {
        Self {
            durable: Some(durable),
            ephemeral,
            timeout,
        }
    }

    /// Create a store with no durable backend configured.
    pub fn ephemeral_only(ephemeral: EphemeralStore) -> Self {
        Self {
            durable: None,
            ephemeral,
            timeout: DEFAULT_DURABLE_TIMEOUT,
        }
    }

    /// Access the ephemeral store.
    pub fn ephemeral(&self) -> &EphemeralStore {
        &self.ephemeral
    }

    /// Name of the configured durable backend, if any.
    pub fn durable_name(&self) -> Option<&str> {
        self.durable.as_ref().map(|d| d.name())
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Run a durable call under the timeout. `None` means no backend.
    async fn on_durable<T, F>(&self, call: Option<F>) -> Result<T, BackendError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        let Some(call) = call else {
            return Err(BackendError::NotConfigured);
        };
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(self.timeout_ms())),
        }
    }

    /// Persist a message, falling back to the ephemeral store if the durable
    /// write fails. Exactly one store is written.
    pub async fn create(&self, message: NewMessage) -> Result<Message, StoreError> {
        message.validate()?;

        let outcome = self
            .on_durable(self.durable.as_ref().map(|d| d.insert(&message)))
            .await;

        match outcome {
            Ok(saved) => {
                debug!(
                    session_id = %saved.session_id,
                    message_id = %saved.id,
                    sender = %saved.sender,
                    "Message stored in durable backend"
                );
                Ok(saved)
            }
            Err(reason) => {
                log_fallback("create", &message.session_id, &reason);
                let saved = self.ephemeral.insert(message)?;
                debug!(
                    session_id = %saved.session_id,
                    message_id = %saved.id,
                    sender = %saved.sender,
                    "Message stored in ephemeral store"
                );
                Ok(saved)
            }
        }
    }

    /// All messages of a session, ordered by timestamp ascending.
    ///
    /// Uses the durable rows when the backend answers with at least one row,
    /// otherwise the ephemeral store's messages.
    pub async fn list_by_session(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        validate_session_id(session_id)?;

        let outcome = self
            .on_durable(self.durable.as_ref().map(|d| d.query_by_session(session_id)))
            .await;

        let mut messages = match outcome {
            Ok(rows) if !rows.is_empty() => rows,
            Ok(_) => {
                debug!(session_id, "No durable rows, scanning ephemeral store");
                self.ephemeral.list_by_session(session_id)?
            }
            Err(reason) => {
                log_fallback("list", session_id, &reason);
                self.ephemeral.list_by_session(session_id)?
            }
        };

        // Stable: equal timestamps keep the order the store returned.
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    /// Delete a session's messages from both stores.
    ///
    /// Not fallback-gated: an earlier `create` may have landed in either store.
    /// Clearing an empty or unknown session is a no-op.
    pub async fn clear_session(&self, session_id: &str) -> Result<(), StoreError> {
        validate_session_id(session_id)?;

        let outcome = self
            .on_durable(self.durable.as_ref().map(|d| d.delete_by_session(session_id)))
            .await;
        if let Err(reason) = outcome {
            log_fallback("clear", session_id, &reason);
        }

        let removed = self.ephemeral.clear_session(session_id)?;
        debug!(session_id, removed, "Session cleared");
        Ok(())
    }
}

fn log_fallback(operation: &str, session_id: &str, reason: &BackendError) {
    match reason {
        BackendError::NotConfigured => {
            debug!(operation, session_id, "No durable backend, using ephemeral store");
        }
        _ => {
            warn!(
                operation,
                session_id,
                error = %reason,
                "Durable backend failed, using ephemeral store"
            );
        }
    }
}
