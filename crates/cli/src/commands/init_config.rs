//! Predictor configuration bootstrap command

use anyhow::{bail, Result};
use foodlens_lib::PredictorConfig;
use tracing::info;

use crate::config::ResolvedPaths;
use crate::output::{print_json, print_success, print_warning, OutputFormat};

/// Write a predictor configuration file, keeping built-in defaults for unset values
pub fn run(
    paths: &ResolvedPaths,
    food_buffer: Option<u32>,
    extra_percent: Option<f64>,
    force: bool,
) -> Result<()> {
    if paths.config.exists() && !force {
        print_warning("Use --force to overwrite the existing file");
        bail!("Config file {:?} already exists", paths.config);
    }

    let mut config = PredictorConfig::default();
    if let Some(buffer) = food_buffer {
        config = config.with_food_buffer(buffer);
    }
    if let Some(percent) = extra_percent {
        if !percent.is_finite() || percent < 0.0 {
            bail!("--extra-percent must be a non-negative number, got {}", percent);
        }
        config.extra_percent = percent;
    }

    config.save(&paths.config)?;
    info!(
        path = %paths.config.display(),
        food_buffer = config.food_buffer,
        extra_percent = config.extra_percent,
        "Wrote predictor configuration"
    );

    match paths.format {
        OutputFormat::Json => print_json(&config)?,
        OutputFormat::Table => print_success(&format!(
            "Wrote {} (food_buffer={}, extra_percent={})",
            paths.config.display(),
            config.food_buffer,
            config.extra_percent
        )),
    }

    Ok(())
}
