/// Application configuration
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::i18n::Language;
use crate::views::board::MovePolicy;

pub const DEFAULT_SERVER: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend origin, no trailing slash
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub language: Language,
    /// Tasks per page in the task list
    pub page_size: usize,
    /// Who may move a card between board columns
    pub move_policy: MovePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER.to_string(),
            request_timeout_secs: 15,
            language: Language::En,
            page_size: 6,
            move_policy: MovePolicy::AssigneeOnly,
        }
    }
}

impl Config {
    /// Apply `TASKDESK_SERVER` on top of the file values
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(server) = std::env::var("TASKDESK_SERVER") {
            if !server.trim().is_empty() {
                self.server_url = server;
            }
        }
        self.normalize()
    }

    fn normalize(mut self) -> Self {
        self.server_url = self.server_url.trim().trim_end_matches('/').to_string();
        if self.page_size == 0 {
            self.page_size = 1;
        }
        self
    }
}

/// Config file path
/// Linux: ~/.config/taskdesk/config.toml
/// macOS: ~/Library/Application Support/taskdesk/config.toml
/// Windows: %APPDATA%\taskdesk\config.toml
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("could not determine the config directory")?;
    Ok(config_dir.join("taskdesk").join("config.toml"))
}

/// Directory for the session file and the log
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().context("could not determine the data directory")?;
    Ok(data_dir.join("taskdesk"))
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

    Ok(config.normalize())
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;

    Ok(())
}

/// Load the config, writing the defaults on first run
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        let config = Config::default();
        save_config_to(&config, &path)?;
        tracing::info!(path = %path.display(), "wrote default config");
        return Ok(config.with_env_overrides());
    }

    Ok(load_config_from(&path)?.with_env_overrides())
}

/// Persist the server origin; returns it normalized
pub fn set_server(url: String) -> Result<String> {
    let path = get_config_path()?;
    let mut config = load_config_from(&path)?;
    config.server_url = url;
    let config = config.normalize();
    save_config_to(&config, &path)?;
    Ok(config.server_url)
}

pub fn set_language(language: Language) -> Result<()> {
    let path = get_config_path()?;
    let mut config = load_config_from(&path)?;
    config.language = language;
    save_config_to(&config, &path)
}

pub fn show_config() -> Result<()> {
    let path = get_config_path()?;
    let config = load_config_from(&path)?.with_env_overrides();
    println!("Current configuration:");
    println!("  server:       {}", config.server_url);
    println!("  timeout:      {}s", config.request_timeout_secs);
    println!("  language:     {}", config.language.code());
    println!("  page size:    {}", config.page_size);
    println!("  move policy:  {}", config.move_policy.as_str());
    println!();
    println!("Config file: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server_url = \"https://tasks.example.com/\"\nlanguage = \"fr\"\n")
            .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.server_url, "https://tasks.example.com");
        assert_eq!(config.language, Language::Fr);
        assert_eq!(config.page_size, 6);
        assert_eq!(config.move_policy, MovePolicy::AssigneeOnly);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            move_policy: MovePolicy::Unrestricted,
            page_size: 10,
            ..Config::default()
        };
        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }
}
