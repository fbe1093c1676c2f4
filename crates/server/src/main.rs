//! FoodLens predictor service
//!
//! Serves food recommendations for planned campus events over HTTP.

use anyhow::Result;
use foodlens_lib::{
    health::{components, HealthRegistry},
    observability::{PredictorMetrics, StructuredLogger},
    predictor::ModelCache,
    Recommender,
};
use foodlens_server::{api, ServerConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting foodlens-server");

    let config = ServerConfig::load()?;
    info!(
        data_path = %config.data_path.display(),
        predictor_config_path = %config.predictor_config_path.display(),
        cache_models = config.cache_models,
        "Server configured"
    );

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::PREDICTOR).await;
    health_registry
        .probe_inputs(&config.data_path, &config.predictor_config_path)
        .await;

    let metrics = PredictorMetrics::new();
    let logger = StructuredLogger::new("foodlens-server");
    logger.log_startup(SERVICE_VERSION, &config.data_path.display().to_string());

    // Configuration is read once here and handed to the recommender
    let mut recommender = Recommender::from_files(&config.data_path, &config.predictor_config_path)?
        .with_logger(logger.clone());
    if config.cache_models {
        recommender = recommender.with_cache(Arc::new(ModelCache::new()));
    }

    let app_state = Arc::new(api::AppState::new(
        Arc::new(recommender),
        health_registry.clone(),
        metrics,
    ));

    health_registry.set_ready(true).await;

    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    tokio::select! {
        result = api_handle => {
            result??;
        }
        _ = tokio::signal::ctrl_c() => {
            logger.log_shutdown("SIGINT received");
            info!("Shutting down");
        }
    }

    Ok(())
}
