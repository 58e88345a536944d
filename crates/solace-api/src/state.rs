//! Application state shared by CLI commands and HTTP handlers.

use std::path::PathBuf;
use std::sync::Arc;

use solace_infra::config::load_service_config;
use solace_infra::filesystem::{ensure_data_dir, resolve_data_dir};
use solace_infra::service::{build_orchestrator, SolaceOrchestrator};
use solace_types::config::ServiceConfig;

/// Shared application state.
///
/// Cheap to clone; the orchestrator is shared behind an `Arc` so every
/// request sees the same message store.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SolaceOrchestrator>,
    pub config: Arc<ServiceConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data directory, load `solace.toml`, wire the orchestrator.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir).await?;

        let config = load_service_config(&data_dir).await;
        Ok(Self::with_config(config, data_dir).await)
    }

    /// Wire the orchestrator for an already-loaded configuration.
    pub async fn with_config(config: ServiceConfig, data_dir: PathBuf) -> Self {
        let orchestrator = build_orchestrator(&config, &data_dir).await;
        Self {
            orchestrator: Arc::new(orchestrator),
            config: Arc::new(config),
            data_dir,
        }
    }
}
