use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level mjv config file structure.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct MjvConfig {
    /// Base URL of the coaching-session API (e.g. http://localhost:8000/api/v1).
    pub base_url: Option<String>,
    /// Directory holding local snapshot files when no API is used.
    pub data_dir: Option<PathBuf>,
}

impl MjvConfig {
    /// Load config from ~/.mjv/config.toml. Returns default if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(MjvConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: MjvConfig =
            toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;
        Ok(config)
    }
}

/// Resolve the API base URL through the chain: CLI flag > MJV_API_URL env > config.
/// None means no API is configured and local files should be used.
pub fn resolve_base_url(cli_flag: Option<&str>, config: &MjvConfig) -> Option<String> {
    if let Some(url) = cli_flag {
        if !url.is_empty() {
            return Some(url.to_string());
        }
    }
    if let Ok(url) = std::env::var("MJV_API_URL") {
        if !url.is_empty() {
            return Some(url);
        }
    }
    config.base_url.clone()
}

/// Resolve the snapshot directory: CLI flag > config > ./data.
pub fn resolve_data_dir(cli_flag: Option<PathBuf>, config: &MjvConfig) -> PathBuf {
    cli_flag
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Path to the config file: ~/.mjv/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".mjv").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.mjv/config.toml
# Resolution order: CLI flag > MJV_API_URL env var > this file

# base_url = "http://localhost:8000/api/v1"
# data_dir = "/path/to/snapshot"
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config() -> Result<bool> {
    let path = config_path()?;
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, default_config_template())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flag_wins_over_config() {
        let config = MjvConfig {
            base_url: Some("http://config:8000".into()),
            data_dir: None,
        };
        assert_eq!(
            resolve_base_url(Some("http://cli:8000"), &config).as_deref(),
            Some("http://cli:8000")
        );
    }

    #[test]
    fn data_dir_defaults_to_data() {
        let config = MjvConfig::default();
        assert_eq!(resolve_data_dir(None, &config), PathBuf::from("data"));
    }
}
