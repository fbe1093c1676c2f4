//! User settings for the CLI

use crate::output::OutputFormat;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_DATA_PATH: &str = "model/past_events.csv";
const DEFAULT_CONFIG_PATH: &str = "model/predictor_config.json";

/// Defaults read from `~/.config/foodlens/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Historical events CSV
    pub data_path: Option<PathBuf>,
    /// Predictor configuration JSON
    pub config_path: Option<PathBuf>,
    /// Default output format ("table" or "json")
    pub default_format: Option<String>,
}

/// Input locations and output format after applying flags and settings
#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub data: PathBuf,
    pub config: PathBuf,
    pub format: OutputFormat,
}

impl Settings {
    /// Load settings from file; a missing file means no overrides
    pub fn load() -> Result<Self> {
        let Some(settings_path) = Self::settings_path() else {
            return Ok(Self::default());
        };

        if !settings_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&settings_path)
            .with_context(|| format!("Failed to read settings file {:?}", settings_path))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {:?}", settings_path))
    }

    /// Command-line values win, then settings, then built-in defaults
    pub fn resolve(
        &self,
        data: Option<PathBuf>,
        config: Option<PathBuf>,
        format: Option<OutputFormat>,
    ) -> ResolvedPaths {
        let settings_format = self
            .default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok());

        ResolvedPaths {
            data: data
                .or_else(|| self.data_path.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            config: config
                .or_else(|| self.config_path.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            format: format.or(settings_format).unwrap_or_default(),
        }
    }

    fn settings_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("foodlens").join("config.json"))
    }
}
