//! Fitted attendance model
//!
//! Pairs the feature encoder with the regression tree so that prediction
//! always goes through exactly the transformation used during fitting.

use super::features::{EventFeatures, FeatureEncoder};
use super::tree::{DecisionTreeRegressor, TreeParams};
use super::AttendancePredictor;
use crate::error::{PredictorError, Result};
use crate::models::{HistoricalEvent, PredictionRequest};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Version label for models fit from rows with no known source file
pub const UNVERSIONED: &str = "unversioned";

/// Length of the content-hash prefix used as a model version
const VERSION_PREFIX_LEN: usize = 12;

/// Encoder plus tree, fit on the full historical table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceModel {
    encoder: FeatureEncoder,
    tree: DecisionTreeRegressor,
    version: String,
    training_rows: usize,
}

impl AttendanceModel {
    /// Fit on every row with the default depth cap of 5
    pub fn fit(rows: &[HistoricalEvent]) -> Result<Self> {
        Self::fit_with_params(rows, TreeParams::default())
    }

    pub fn fit_with_params(rows: &[HistoricalEvent], params: TreeParams) -> Result<Self> {
        if rows.is_empty() {
            return Err(PredictorError::EmptyTrainingSet);
        }

        let start = Instant::now();
        let encoder = FeatureEncoder::fit(rows);
        let x = encoder.encode_all(rows);
        let y: Vec<f64> = rows.iter().map(|r| r.expected_attendance).collect();
        let tree = DecisionTreeRegressor::fit(&x, &y, params).ok_or(PredictorError::EmptyTrainingSet)?;

        debug!(
            rows = rows.len(),
            features = encoder.width(),
            depth = tree.depth(),
            leaves = tree.leaf_count(),
            elapsed_us = start.elapsed().as_micros(),
            "Fitted attendance model"
        );

        Ok(Self {
            encoder,
            tree,
            version: UNVERSIONED.to_string(),
            training_rows: rows.len(),
        })
    }

    /// Tag the model with the content hash of the file it was fit from
    pub fn with_content_hash(mut self, content_hash: &str) -> Self {
        self.version = content_hash.chars().take(VERSION_PREFIX_LEN).collect();
        self
    }

    /// Raw (untruncated) tree output for any event-like input
    pub fn predict_raw<E: EventFeatures>(&self, row: &E) -> f64 {
        self.tree.predict(&self.encoder.encode(row))
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn tree(&self) -> &DecisionTreeRegressor {
        &self.tree
    }

    pub fn training_rows(&self) -> usize {
        self.training_rows
    }

    /// Tree rendered with encoded feature names
    pub fn export_text(&self) -> String {
        self.tree.export_text(&self.encoder.feature_names())
    }
}

impl AttendancePredictor for AttendanceModel {
    fn predict_attendance(&self, request: &PredictionRequest) -> u32 {
        truncate_attendance(self.predict_raw(request))
    }

    fn model_version(&self) -> &str {
        &self.version
    }
}

/// Truncate toward zero, clamping to the `u32` range
pub fn truncate_attendance(raw: f64) -> u32 {
    if raw.is_nan() || raw <= 0.0 {
        0
    } else if raw >= u32::MAX as f64 {
        u32::MAX
    } else {
        raw.trunc() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(building: &str, event_type: &str, rsvps: u32, attendance: f64) -> HistoricalEvent {
        HistoricalEvent {
            building: building.to_string(),
            zone: "north".into(),
            event_type: event_type.into(),
            day: "wed".into(),
            time: "18:00".into(),
            rsvps,
            expected_attendance: attendance,
        }
    }

    #[test]
    fn test_empty_training_set() {
        let err = AttendanceModel::fit(&[]).unwrap_err();
        assert!(matches!(err, PredictorError::EmptyTrainingSet));
    }

    #[test]
    fn test_single_row_predicts_its_label() {
        let model = AttendanceModel::fit(&[row("Boelter Hall", "club", 150, 140.0)]).unwrap();
        let request = PredictionRequest::new("Boelter Hall", "north", "club", "wed", "18:00", 150, 160);
        assert_eq!(model.predict_attendance(&request), 140);
        assert_eq!(model.training_rows(), 1);
    }

    #[test]
    fn test_prediction_truncates() {
        let rows = vec![
            row("Boelter Hall", "club", 100, 90.0),
            row("Boelter Hall", "club", 100, 91.0),
        ];
        let model = AttendanceModel::fit(&rows).unwrap();
        let request = PredictionRequest::new("Boelter Hall", "north", "club", "wed", "18:00", 100, 0);

        assert!((model.predict_raw(&request) - 90.5).abs() < 1e-9);
        assert_eq!(model.predict_attendance(&request), 90);
    }

    #[test]
    fn test_unknown_categories_do_not_fail() {
        let rows = vec![
            row("Boelter Hall", "club", 50, 40.0),
            row("Royce Hall", "fair", 200, 230.0),
        ];
        let model = AttendanceModel::fit(&rows).unwrap();
        let request =
            PredictionRequest::new("Nowhere Annex", "downtown", "hackathon", "sun", "07:00", 210, 0);

        let predicted = model.predict_attendance(&request);
        assert!(predicted == 40 || predicted == 230, "predicted {}", predicted);
    }

    #[test]
    fn test_repeated_fits_agree() {
        let rows: Vec<_> = (0..40)
            .map(|i| {
                let building = if i % 2 == 0 { "Gonda" } else { "Royce Hall" };
                let kind = ["club", "seminar", "fair", "career_fair"][i % 4];
                row(building, kind, 20 + i as u32 * 5, (i * 3 % 17) as f64 + 10.0)
            })
            .collect();
        let request = PredictionRequest::new("Gonda", "north", "fair", "wed", "18:00", 90, 0);

        let a = AttendanceModel::fit(&rows).unwrap();
        let b = AttendanceModel::fit(&rows).unwrap();
        assert_eq!(a.predict_attendance(&request), b.predict_attendance(&request));
        assert_eq!(a.export_text(), b.export_text());
    }

    #[test]
    fn test_version_from_content_hash() {
        let model = AttendanceModel::fit(&[row("Gonda", "club", 1, 1.0)]).unwrap();
        assert_eq!(model.model_version(), UNVERSIONED);

        let model = model.with_content_hash("0123456789abcdef0123");
        assert_eq!(model.model_version(), "0123456789ab");
    }

    #[test]
    fn test_truncate_attendance() {
        assert_eq!(truncate_attendance(140.99), 140);
        assert_eq!(truncate_attendance(0.4), 0);
        assert_eq!(truncate_attendance(-3.0), 0);
        assert_eq!(truncate_attendance(f64::NAN), 0);
    }
}
