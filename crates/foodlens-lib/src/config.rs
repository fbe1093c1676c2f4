//! Predictor configuration
//!
//! The configuration lives in a small JSON side file next to the training
//! data. It is parsed through the `config` crate so missing keys fall back
//! to their serde defaults.

use crate::error::{PredictorError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default additive margin on top of predicted attendance
pub const DEFAULT_FOOD_BUFFER: u32 = 15;

/// Default order margin used when scoring surplus on training data
pub const DEFAULT_EXTRA_PERCENT: f64 = 0.1;

/// Tunables for the recommendation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Portions added on top of the predicted attendance
    #[serde(default = "default_food_buffer")]
    pub food_buffer: u32,

    /// Fractional over-order margin. Not used by `recommend`; only the
    /// training-set surplus evaluation reads it.
    #[serde(default = "default_extra_percent")]
    pub extra_percent: f64,
}

fn default_food_buffer() -> u32 {
    DEFAULT_FOOD_BUFFER
}

fn default_extra_percent() -> f64 {
    DEFAULT_EXTRA_PERCENT
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            food_buffer: DEFAULT_FOOD_BUFFER,
            extra_percent: DEFAULT_EXTRA_PERCENT,
        }
    }
}

impl PredictorConfig {
    pub fn with_food_buffer(mut self, food_buffer: u32) -> Self {
        self.food_buffer = food_buffer;
        self
    }

    /// Load configuration from a JSON file.
    ///
    /// A missing or unreadable file is `DataUnavailable`; a file that is
    /// not valid JSON (or has mistyped keys) is `InvalidConfig`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| PredictorError::unavailable(path, e))?;
        let config = Self::from_json_str(&content)?;
        debug!(
            path = %path.display(),
            food_buffer = config.food_buffer,
            extra_percent = config.extra_percent,
            "Loaded predictor configuration"
        );
        Ok(config)
    }

    /// Parse configuration from an in-memory JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Json))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Write configuration as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {:?}", path))?;
        Ok(())
    }
}
