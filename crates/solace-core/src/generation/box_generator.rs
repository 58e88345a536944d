//! BoxGenerator -- object-safe dynamic dispatch wrapper for Generator.
//!
//! Same blanket-impl pattern as `BoxDurableBackend`.

use std::future::Future;
use std::pin::Pin;

use solace_types::error::GenerationError;
use solace_types::message::HistoryEntry;

use super::generator::Generator;

/// Object-safe version of [`Generator`] with a boxed future.
pub trait GeneratorDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_boxed<'a>(
        &'a self,
        utterance: &'a str,
        history: &'a [HistoryEntry],
    ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>>;
}

impl<T: Generator> GeneratorDyn for T {
    fn name(&self) -> &str {
        Generator::name(self)
    }

    fn generate_boxed<'a>(
        &'a self,
        utterance: &'a str,
        history: &'a [HistoryEntry],
    ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>> {
        Box::pin(self.generate(utterance, history))
    }
}

/// Type-erased generator, chosen at runtime from configuration.
pub struct BoxGenerator {
    inner: Box<dyn GeneratorDyn + Send + Sync>,
}

impl BoxGenerator {
    /// Wrap a concrete `Generator` in a type-erased box.
    pub fn new<T: Generator + 'static>(generator: T) -> Self {
        Self {
            inner: Box::new(generator),
        }
    }
}

impl Generator for BoxGenerator {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(
        &self,
        utterance: &str,
        history: &[HistoryEntry],
    ) -> Result<String, GenerationError> {
        self.inner.generate_boxed(utterance, history).await
    }
}
