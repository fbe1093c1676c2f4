//! Model evaluation command

use anyhow::{Context, Result};
use foodlens_lib::predictor::AttendancePredictor;
use foodlens_lib::Recommender;
use serde_json::json;

use crate::config::ResolvedPaths;
use crate::output::{color_accuracy, print_fields, print_json, FieldRow, OutputFormat};

/// Fit the model and report how it does on its own training rows
pub fn run(paths: &ResolvedPaths) -> Result<()> {
    let recommender = Recommender::from_files(&paths.data, &paths.config)
        .context("Failed to load predictor configuration")?;
    let (model, report) = recommender
        .evaluate()
        .context("Failed to evaluate model")?;

    match paths.format {
        OutputFormat::Json => print_json(&json!({
            "model_version": model.model_version(),
            "report": report,
        }))?,
        OutputFormat::Table => print_fields(vec![
            FieldRow::new("Model version", model.model_version()),
            FieldRow::new("Training rows", report.rows),
            FieldRow::new("Features", report.features),
            FieldRow::new("Tree depth", report.tree_depth),
            FieldRow::new("Leaves", report.leaves),
            FieldRow::new("Surplus accuracy", color_accuracy(report.surplus_accuracy)),
            FieldRow::new(
                "Mean absolute error",
                format!("{:.2}", report.mean_absolute_error),
            ),
        ]),
    }

    Ok(())
}
