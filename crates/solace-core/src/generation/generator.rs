//! Generator trait definition.

use solace_types::error::GenerationError;
use solace_types::message::HistoryEntry;

/// Port for the generation collaborator.
///
/// Given the new utterance and a bounded, chronologically ordered slice of
/// prior messages, produce reply text. Implementations live in solace-infra
/// (e.g., `OpenAiGenerator`). Failures are reported, never retried: the turn
/// orchestrator substitutes its default reply.
pub trait Generator: Send + Sync {
    /// Short adapter name for logs (e.g., "openai", "static").
    fn name(&self) -> &str;

    /// Produce a reply to `utterance` given the prior `history`.
    fn generate(
        &self,
        utterance: &str,
        history: &[HistoryEntry],
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}
