//! Service configuration types for Solace.
//!
//! `ServiceConfig` represents `solace.toml` in the data directory. Every
//! field has a default, so an empty or missing file yields a working
//! configuration (SQLite durable store, OpenAI generation).

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::message::MAX_CONTENT_CHARS;

/// Number of prior messages replayed to the generation collaborator.
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Most recent messages passed to the generator on each turn (at most 6).
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Maximum characters accepted in a user utterance (at most 500).
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub durable: DurableConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_history_window() -> usize {
    DEFAULT_HISTORY_WINDOW
}

fn default_max_content_chars() -> usize {
    MAX_CONTENT_CHARS
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            max_content_chars: default_max_content_chars(),
            server: ServerConfig::default(),
            durable: DurableConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which durable backend adapter to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurableKind {
    #[default]
    Sqlite,
    Postgrest,
    /// No durable backend; every message lives in the ephemeral store.
    None,
}

impl fmt::Display for DurableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurableKind::Sqlite => write!(f, "sqlite"),
            DurableKind::Postgrest => write!(f, "postgrest"),
            DurableKind::None => write!(f, "none"),
        }
    }
}

/// Durable backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurableConfig {
    #[serde(default)]
    pub kind: DurableKind,

    /// SQLite URL or PostgREST base URL. Empty means "use the default"
    /// (a database file in the data directory for SQLite).
    #[serde(default)]
    pub url: String,

    /// Table (PostgREST resource) holding messages.
    #[serde(default = "default_table")]
    pub table: String,

    /// Environment variable holding the PostgREST API key.
    #[serde(default = "default_durable_key_env")]
    pub api_key_env: String,

    /// Per-call timeout; on expiry the ephemeral store is used instead.
    #[serde(default = "default_durable_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_table() -> String {
    "messages".to_string()
}

fn default_durable_key_env() -> String {
    "SUPABASE_ANON_KEY".to_string()
}

fn default_durable_timeout_ms() -> u64 {
    5_000
}

impl Default for DurableConfig {
    fn default() -> Self {
        Self {
            kind: DurableKind::default(),
            url: String::new(),
            table: default_table(),
            api_key_env: default_durable_key_env(),
            timeout_ms: default_durable_timeout_ms(),
        }
    }
}

/// Which generation adapter to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationKind {
    #[default]
    Openai,
    /// Always answer with `static_reply`. Useful offline and in tests.
    Static,
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationKind::Openai => write!(f, "openai"),
            GenerationKind::Static => write!(f, "static"),
        }
    }
}

/// Generation collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub kind: GenerationKind,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-call timeout; on expiry the default reply is used.
    #[serde(default = "default_generation_timeout_ms")]
    pub timeout_ms: u64,

    /// Environment variable holding the provider API key.
    #[serde(default = "default_generation_key_env")]
    pub api_key_env: String,

    /// Reply used by the static generator. `None` means the default reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_reply: Option<String>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_generation_timeout_ms() -> u64 {
    30_000
}

fn default_generation_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            kind: GenerationKind::default(),
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_ms: default_generation_timeout_ms(),
            api_key_env: default_generation_key_env(),
            static_reply: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_config_default_values() {
        let config = ServiceConfig::default();
        assert_eq!(config.history_window, 6);
        assert_eq!(config.max_content_chars, 500);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.durable.kind, DurableKind::Sqlite);
        assert_eq!(config.durable.timeout_ms, 5_000);
        assert_eq!(config.generation.model, "gpt-4o");
        assert_eq!(config.generation.max_tokens, 500);
    }

    #[test]
    fn test_service_config_deserialize_empty() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.history_window, DEFAULT_HISTORY_WINDOW);
        assert_eq!(config.generation.kind, GenerationKind::Openai);
        assert_eq!(config.durable.table, "messages");
    }

    #[test]
    fn test_service_config_deserialize_with_values() {
        let toml_str = r#"
history_window = 4

[server]
port = 8080

[durable]
kind = "postgrest"
url = "https://example.supabase.co"
timeout_ms = 1500

[generation]
kind = "static"
static_reply = "Tell me more."
"#;
        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.history_window, 4);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.durable.kind, DurableKind::Postgrest);
        assert_eq!(config.durable.timeout_ms, 1500);
        assert_eq!(config.durable.api_key_env, "SUPABASE_ANON_KEY");
        assert_eq!(config.generation.kind, GenerationKind::Static);
        assert_eq!(config.generation.static_reply.as_deref(), Some("Tell me more."));
    }

    #[test]
    fn test_durable_kind_display() {
        assert_eq!(DurableKind::None.to_string(), "none");
        assert_eq!(DurableKind::Postgrest.to_string(), "postgrest");
    }
}
