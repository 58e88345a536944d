//! DurableBackend trait definition.
//!
//! The durable backend is a remote (or on-disk) store that may be
//! unavailable at any time. Implementations translate between the domain
//! `Message` and their own row shape (e.g. `is_bot` vs `Sender`).

use solace_types::error::BackendError;
use solace_types::message::{Message, NewMessage};

/// Port for the durable message store.
///
/// Implementations live in solace-infra (e.g., `SqliteMessageBackend`,
/// `PostgrestBackend`). Uses native async fn in traits (RPITIT, Rust 2024
/// edition). Errors are reported, never retried: the caller decides on
/// fallback.
pub trait DurableBackend: Send + Sync {
    /// Short adapter name for logs (e.g., "sqlite", "postgrest").
    fn name(&self) -> &str;

    /// Insert a message. The backend assigns the id and timestamp.
    fn insert(
        &self,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<Message, BackendError>> + Send;

    /// All messages for a session, ordered by timestamp ascending.
    fn query_by_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, BackendError>> + Send;

    /// Delete every message of a session. Deleting nothing is not an error.
    fn delete_by_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<(), BackendError>> + Send;
}
