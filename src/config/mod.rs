//! Configuration management for Dojo

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::engine::Timing;
use crate::theme::Theme;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Selected theme name
    pub theme: String,

    /// Delay before a step change is applied, in milliseconds
    pub transition_delay_ms: u64,

    /// Delay between a correct answer and moving on, in milliseconds
    pub auto_advance_delay_ms: u64,

    /// Classroom file to use instead of the built-in content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_path: Option<PathBuf>,

    /// Vim mode enabled
    pub vim_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            theme: "Tokyo Night".to_string(),
            transition_delay_ms: timing.transition_delay.as_millis() as u64,
            auto_advance_delay_ms: timing.auto_advance_delay.as_millis() as u64,
            content_path: None,
            vim_mode: true,
        }
    }
}

impl Config {
    /// Load the user's config, writing defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load a config file, creating it with defaults when missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if let Some(content) = &config.content_path {
            tracing::debug!("Config points at classroom file {}", content.display());
        }
        Ok(config)
    }

    /// Write this config as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "dojo").context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "dojo").context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Get the log file path
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("dojo.log"))
    }

    /// Transition delays for exercise sessions
    pub fn timing(&self) -> Timing {
        Timing {
            transition_delay: Duration::from_millis(self.transition_delay_ms),
            auto_advance_delay: Duration::from_millis(self.auto_advance_delay_ms),
        }
    }

    /// Get the active theme
    pub fn active_theme(&self) -> Theme {
        Theme::tokyo_night()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_tokyo_night_theme() {
        let config = Config::default();
        assert_eq!(config.theme, "Tokyo Night");
    }

    #[test]
    fn default_timing_matches_engine_defaults() {
        let config = Config::default();
        assert_eq!(config.timing(), Timing::default());
        assert_eq!(config.transition_delay_ms, 500);
        assert_eq!(config.auto_advance_delay_ms, 800);
    }

    #[test]
    fn config_serializes_to_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("Tokyo Night"));
        assert!(!json.contains("content_path"));
    }

    #[test]
    fn config_deserializes_partial_json() {
        let json = r#"{"transition_delay_ms":0,"vim_mode":false}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.timing().transition_delay, Duration::ZERO);
        assert_eq!(config.auto_advance_delay_ms, 800);
        assert!(!config.vim_mode);
    }

    #[test]
    fn load_from_creates_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let created = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created, Config::default());

        let edited = Config { vim_mode: false, auto_advance_delay_ms: 1200, ..created };
        edited.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), edited);
    }

    #[test]
    fn load_from_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
