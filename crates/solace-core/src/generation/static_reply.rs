//! Fixed-reply generator.

use solace_types::error::GenerationError;
use solace_types::message::HistoryEntry;

use super::generator::Generator;

/// Answers every utterance with the same text.
///
/// Selected with `generation.kind = "static"`, and used when no provider
/// API key is available.
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    reply: String,
}

impl StaticGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl Generator for StaticGenerator {
    fn name(&self) -> &str {
        "static"
    }

    async fn generate(
        &self,
        _utterance: &str,
        _history: &[HistoryEntry],
    ) -> Result<String, GenerationError> {
        if self.reply.trim().is_empty() {
            return Err(GenerationError::EmptyReply);
        }
        Ok(self.reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::box_generator::BoxGenerator;

    #[tokio::test]
    async fn test_static_generator_ignores_input() {
        let generator = StaticGenerator::new("Tell me more.");
        let reply = generator.generate("hello", &[]).await.unwrap();
        assert_eq!(reply, "Tell me more.");
    }

    #[tokio::test]
    async fn test_empty_static_reply_is_an_error() {
        let generator = BoxGenerator::new(StaticGenerator::new("  "));
        assert_eq!(generator.name(), "static");
        let err = generator.generate("hello", &[]).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyReply));
    }
}
