//! BoxDurableBackend -- object-safe dynamic dispatch wrapper for DurableBackend.
//!
//! 1. `DurableBackendDyn` is an object-safe trait with boxed futures
//! 2. It is blanket-implemented for all `T: DurableBackend`
//! 3. `BoxDurableBackend` wraps `Box<dyn DurableBackendDyn>` and implements
//!    `DurableBackend` itself, so the message store can stay generic

use std::future::Future;
use std::pin::Pin;

use solace_types::error::BackendError;
use solace_types::message::{Message, NewMessage};

use super::durable::DurableBackend;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`DurableBackend`] with boxed futures.
pub trait DurableBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn insert_boxed<'a>(
        &'a self,
        message: &'a NewMessage,
    ) -> BoxFuture<'a, Result<Message, BackendError>>;

    fn query_by_session_boxed<'a>(
        &'a self,
        session_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Message>, BackendError>>;

    fn delete_by_session_boxed<'a>(
        &'a self,
        session_id: &'a str,
    ) -> BoxFuture<'a, Result<(), BackendError>>;
}

impl<T: DurableBackend> DurableBackendDyn for T {
    fn name(&self) -> &str {
        DurableBackend::name(self)
    }

    fn insert_boxed<'a>(
        &'a self,
        message: &'a NewMessage,
    ) -> BoxFuture<'a, Result<Message, BackendError>> {
        Box::pin(self.insert(message))
    }

    fn query_by_session_boxed<'a>(
        &'a self,
        session_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Message>, BackendError>> {
        Box::pin(self.query_by_session(session_id))
    }

    fn delete_by_session_boxed<'a>(
        &'a self,
        session_id: &'a str,
    ) -> BoxFuture<'a, Result<(), BackendError>> {
        Box::pin(self.delete_by_session(session_id))
    }
}

/// Type-erased durable backend, chosen at runtime from configuration.
pub struct BoxDurableBackend {
    inner: Box<dyn DurableBackendDyn + Send + Sync>,
}

impl BoxDurableBackend {
    /// Wrap a concrete `DurableBackend` in a type-erased box.
    pub fn new<T: DurableBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }
}

impl DurableBackend for BoxDurableBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn insert(&self, message: &NewMessage) -> Result<Message, BackendError> {
        self.inner.insert_boxed(message).await
    }

    async fn query_by_session(&self, session_id: &str) -> Result<Vec<Message>, BackendError> {
        self.inner.query_by_session_boxed(session_id).await
    }

    async fn delete_by_session(&self, session_id: &str) -> Result<(), BackendError> {
        self.inner.delete_by_session_boxed(session_id).await
    }
}
