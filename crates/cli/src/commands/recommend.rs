//! Food recommendation command

use anyhow::{Context, Result};
use clap::Args;
use foodlens_lib::{EventType, PredictionRequest, TimeSlot, Weekday, Zone};

use crate::config::ResolvedPaths;
use crate::output::{color_reduction, print_fields, print_info, print_json, FieldRow, OutputFormat};

/// The planned event to recommend food for
#[derive(Debug, Args)]
pub struct RecommendArgs {
    /// Building name
    #[arg(long)]
    pub building: String,

    #[arg(long, help = domain_help("Campus zone", Zone::LABELS))]
    pub zone: String,

    #[arg(long, help = domain_help("Event type", EventType::LABELS))]
    pub event_type: String,

    #[arg(long, help = domain_help("Day of week", Weekday::LABELS))]
    pub day: String,

    #[arg(long, help = domain_help("Start time (HH:MM)", TimeSlot::LABELS))]
    pub time: String,

    /// Number of RSVPs
    #[arg(long)]
    pub rsvps: u32,

    /// Food quantity currently planned
    #[arg(long)]
    pub planned_food: u32,
}

/// Help line listing the known labels of a categorical field
fn domain_help(field: &str, labels: &[&str]) -> String {
    format!(
        "{} ({}; other values only count if they appear in the training data)",
        field,
        labels.join(", ")
    )
}

impl From<RecommendArgs> for PredictionRequest {
    fn from(args: RecommendArgs) -> Self {
        PredictionRequest::new(
            args.building,
            args.zone,
            args.event_type,
            args.day,
            args.time,
            args.rsvps,
            args.planned_food,
        )
    }
}

/// Fit on the historical table and print the recommendation
pub fn run(paths: &ResolvedPaths, args: RecommendArgs) -> Result<()> {
    let request = PredictionRequest::from(args);
    let result = foodlens_lib::recommend(&paths.data, &paths.config, &request)
        .context("Failed to compute recommendation")?;

    match paths.format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => {
            print_fields(vec![
                FieldRow::new("Predicted attendance", result.predicted_attendance),
                FieldRow::new("Planned food", request.planned_food),
                FieldRow::new("Recommended food", result.recommended_food),
                FieldRow::new("Reduction", color_reduction(result.reduction)),
            ]);
            println!();
            for line in &result.explanation {
                print_info(line);
            }
        }
    }

    Ok(())
}
