//! Assembly of the turn orchestrator from configuration.

use std::path::Path;

use solace_core::generation::box_generator::BoxGenerator;
use solace_core::store::box_durable::BoxDurableBackend;
use solace_core::turn::orchestrator::{TurnOrchestrator, TurnPolicy};
use solace_types::config::ServiceConfig;

use crate::durable::build_message_store;
use crate::generation::create_generator;

/// The orchestrator type wired at runtime.
pub type SolaceOrchestrator = TurnOrchestrator<BoxDurableBackend, BoxGenerator>;

/// Build a ready-to-use orchestrator: message store, generator and policy
/// all derived from `config`.
pub async fn build_orchestrator(config: &ServiceConfig, data_dir: &Path) -> SolaceOrchestrator {
    let store = build_message_store(&config.durable, data_dir).await;
    let generator = create_generator(&config.generation);
    TurnOrchestrator::new(store, generator, TurnPolicy::from_config(config))
}
