//! Decision tree export command

use anyhow::{Context, Result};
use foodlens_lib::{PredictorConfig, Recommender};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

use crate::config::ResolvedPaths;
use crate::output::{print_json, print_success, OutputFormat};

/// Fit the model and print or save its text rendering
pub fn run(paths: &ResolvedPaths, output: Option<PathBuf>) -> Result<()> {
    // The tree depends only on the training data
    let model = Recommender::new(PredictorConfig::default(), &paths.data)
        .load_model()
        .context("Failed to fit model")?;
    let text = model.export_text();
    info!(
        nodes = model.tree().node_count(),
        depth = model.tree().depth(),
        "Exported decision tree"
    );

    match output {
        Some(path) => {
            let content = serde_json::to_string_pretty(&json!({ "tree": text }))?;
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write tree to {:?}", path))?;
            print_success(&format!("Tree written to {}", path.display()));
        }
        None => match paths.format {
            OutputFormat::Json => print_json(&json!({ "tree": text }))?,
            OutputFormat::Table => print!("{}", text),
        },
    }

    Ok(())
}
