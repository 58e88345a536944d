//! Config-driven construction of the durable backend and message store.

use std::path::Path;
use std::time::Duration;

use solace_core::store::box_durable::BoxDurableBackend;
use solace_core::store::ephemeral::EphemeralStore;
use solace_core::store::session::SessionMessageStore;
use solace_types::config::{DurableConfig, DurableKind};
use tracing::{info, warn};

use crate::generation::read_api_key;
use crate::postgrest::PostgrestBackend;
use crate::sqlite::message::SqliteMessageBackend;
use crate::sqlite::pool::{default_database_url, DatabasePool};

/// Build the durable backend named by `config`.
///
/// Returns `None` for `kind = "none"` and when the backend cannot be set up
/// (bad URL, unopenable database). The store then runs ephemeral-only.
pub async fn create_durable_backend(
    config: &DurableConfig,
    data_dir: &Path,
) -> Option<BoxDurableBackend> {
    match config.kind {
        DurableKind::None => {
            info!("No durable backend configured, messages are kept in memory");
            None
        }
        DurableKind::Sqlite => {
            let url = if config.url.is_empty() {
                default_database_url(data_dir)
            } else {
                config.url.clone()
            };
            match DatabasePool::new(&url).await {
                Ok(pool) => {
                    info!(url = %url, "Using SQLite durable backend");
                    Some(BoxDurableBackend::new(SqliteMessageBackend::new(pool)))
                }
                Err(err) => {
                    warn!(url = %url, error = %err, "Failed to open SQLite database, running ephemeral-only");
                    None
                }
            }
        }
        DurableKind::Postgrest => {
            if config.url.trim().is_empty() {
                warn!("durable.kind is postgrest but durable.url is empty, running ephemeral-only");
                return None;
            }
            let api_key = read_api_key(&config.api_key_env);
            if api_key.is_none() {
                warn!(env = %config.api_key_env, "No PostgREST API key set, sending unauthenticated requests");
            }
            info!(url = %config.url, table = %config.table, "Using PostgREST durable backend");
            Some(BoxDurableBackend::new(PostgrestBackend::new(
                &config.url,
                &config.table,
                api_key,
            )))
        }
    }
}

/// Build the message store for `config`, with a fresh ephemeral store.
pub async fn build_message_store(
    config: &DurableConfig,
    data_dir: &Path,
) -> SessionMessageStore<BoxDurableBackend> {
    let ephemeral = EphemeralStore::new();
    match create_durable_backend(config, data_dir).await {
        Some(durable) => SessionMessageStore::new(
            durable,
            ephemeral,
            Duration::from_millis(config.timeout_ms),
        ),
        None => SessionMessageStore::ephemeral_only(ephemeral),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_types::message::NewMessage;

    #[tokio::test]
    async fn test_none_kind_is_ephemeral_only() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DurableConfig {
            kind: DurableKind::None,
            ..Default::default()
        };
        let store = build_message_store(&config, tmp.path()).await;
        assert!(store.durable_name().is_none());

        let saved = store.create(NewMessage::user("s1", "hi")).await.unwrap();
        assert_eq!(saved.id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_sqlite_default_url_lives_in_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = build_message_store(&DurableConfig::default(), tmp.path()).await;
        assert_eq!(store.durable_name(), Some("sqlite"));

        store.create(NewMessage::user("s1", "persisted")).await.unwrap();
        assert!(tmp.path().join("solace.db").exists());
        assert!(store.ephemeral().is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_postgrest_without_url_is_ephemeral_only() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DurableConfig {
            kind: DurableKind::Postgrest,
            ..Default::default()
        };
        assert!(create_durable_backend(&config, tmp.path()).await.is_none());
    }

    #[tokio::test]
    async fn test_unopenable_sqlite_is_ephemeral_only() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DurableConfig {
            url: format!("sqlite://{}/missing/dir/db.sqlite", tmp.path().display()),
            ..Default::default()
        };
        assert!(create_durable_backend(&config, tmp.path()).await.is_none());
    }
}
