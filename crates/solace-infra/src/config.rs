//! Service configuration loader.
//!
//! Reads `solace.toml` from the data directory and deserializes it into
//! [`ServiceConfig`]. Falls back to defaults when the file is missing or
//! malformed.

use std::path::Path;

use solace_types::config::ServiceConfig;

/// File name of the configuration inside the data directory.
pub const CONFIG_FILE: &str = "solace.toml";

/// Load configuration from `{data_dir}/solace.toml`.
///
/// - Missing file: [`ServiceConfig::default()`].
/// - Unreadable or unparsable file: a warning, then the default.
pub async fn load_service_config(data_dir: &Path) -> ServiceConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No {CONFIG_FILE} found at {}, using defaults", config_path.display());
            return ServiceConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ServiceConfig::default();
        }
    };

    match toml::from_str::<ServiceConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ServiceConfig::default()
        }
    }
}

/// Render the effective configuration as TOML.
pub fn render_config(config: &ServiceConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}
