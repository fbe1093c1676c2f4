//! Server configuration

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration, read from `FOODLENS_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// API server port for recommend/health/metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Historical events CSV
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Predictor configuration JSON (food_buffer, extra_percent)
    #[serde(default = "default_predictor_config_path")]
    pub predictor_config_path: PathBuf,

    /// Reuse fitted models while the training file is unchanged
    #[serde(default = "default_cache_models")]
    pub cache_models: bool,
}

fn default_api_port() -> u16 {
    8080
}

fn default_data_path() -> PathBuf {
    PathBuf::from("model/past_events.csv")
}

fn default_predictor_config_path() -> PathBuf {
    PathBuf::from("model/predictor_config.json")
}

fn default_cache_models() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            data_path: default_data_path(),
            predictor_config_path: default_predictor_config_path(),
            cache_models: default_cache_models(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("FOODLENS").try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.data_path, PathBuf::from("model/past_events.csv"));
        assert_eq!(
            config.predictor_config_path,
            PathBuf::from("model/predictor_config.json")
        );
        assert!(config.cache_models);
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let config: ServerConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.api_port, 8080);
        assert!(config.cache_models);
    }
}
