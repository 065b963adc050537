//! Game configuration files
//!
//! Configs are YAML. Every field is optional: whatever a file leaves out
//! keeps its default value. Lookup order is `--config`, then
//! `~/.payday/config.yaml` if it exists, then the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, eyre};
use payday_core::GameConfig;

pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// `~/.payday/`
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".payday")
}

pub fn parse_config(yaml: &str) -> color_eyre::Result<GameConfig> {
    let config: GameConfig =
        serde_saphyr::from_str(yaml).map_err(|e| eyre!("failed to parse config: {e}"))?;
    config.validate()?;
    Ok(config)
}

pub fn load_config_file(path: &Path) -> color_eyre::Result<GameConfig> {
    let yaml = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    parse_config(&yaml).wrap_err_with(|| format!("invalid config {}", path.display()))
}

/// Resolve the config for this run.
pub fn load_config(explicit: Option<&Path>, data_dir: &Path) -> color_eyre::Result<GameConfig> {
    if let Some(path) = explicit {
        tracing::info!(path = %path.display(), "loading config");
        return load_config_file(path);
    }

    let fallback = data_dir.join(CONFIG_FILE_NAME);
    if fallback.exists() {
        tracing::info!(path = %fallback.display(), "loading config from data directory");
        return load_config_file(&fallback);
    }

    tracing::debug!("using built-in config");
    Ok(GameConfig::default())
}

pub fn config_to_yaml(config: &GameConfig) -> color_eyre::Result<String> {
    serde_saphyr::to_string(config).map_err(|e| eyre!("failed to serialize config: {e}"))
}
