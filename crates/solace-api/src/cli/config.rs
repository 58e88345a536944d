//! `solace config`: print the effective configuration.

use std::path::Path;

use anyhow::Result;
use console::style;

use solace_infra::config::{render_config, CONFIG_FILE};
use solace_types::config::ServiceConfig;

pub fn show(config: &ServiceConfig, data_dir: &Path, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "data_dir": data_dir.display().to_string(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let config_path = data_dir.join(CONFIG_FILE);
    let source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", config_path.display())
    };

    println!();
    println!("  {} {}", style("Data dir:").bold(), data_dir.display());
    println!("  {} {}", style("Config:").bold(), source);
    println!();
    for line in render_config(config)?.lines() {
        println!("  {line}");
    }
    println!();
    Ok(())
}
