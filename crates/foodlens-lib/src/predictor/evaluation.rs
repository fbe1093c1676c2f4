//! Training-set evaluation
//!
//! Scores a fitted model as a food-surplus classifier on the rows it was
//! fit on. An event counts as a surplus when the food ordered (rsvps plus
//! `extra_percent`) exceeds attendance plus the food buffer; the model is
//! right when its predicted attendance agrees with the observed one on
//! that question.

use super::inference::AttendanceModel;
use crate::config::PredictorConfig;
use crate::error::{PredictorError, Result};
use crate::models::HistoricalEvent;
use serde::{Deserialize, Serialize};

/// Summary of a model scored on its own training data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub rows: usize,
    pub features: usize,
    pub tree_depth: usize,
    pub leaves: usize,
    /// Share of rows where predicted and actual surplus agree, in [0, 1]
    pub surplus_accuracy: f64,
    /// Mean absolute error of the untruncated attendance prediction
    pub mean_absolute_error: f64,
}

/// Score `model` on `rows` using the order margin and buffer from `config`
pub fn evaluate(
    model: &AttendanceModel,
    rows: &[HistoricalEvent],
    config: &PredictorConfig,
) -> Result<TrainingReport> {
    if rows.is_empty() {
        return Err(PredictorError::EmptyTrainingSet);
    }

    let buffer = config.food_buffer as f64;
    let order_factor = 1.0 + config.extra_percent;

    let mut agreements = 0usize;
    let mut absolute_error = 0.0;
    for row in rows {
        let predicted = model.predict_raw(row);
        let food_ordered = row.rsvps as f64 * order_factor;

        let actual_surplus = food_ordered > row.expected_attendance + buffer;
        let predicted_surplus = food_ordered > predicted + buffer;
        if actual_surplus == predicted_surplus {
            agreements += 1;
        }
        absolute_error += (predicted - row.expected_attendance).abs();
    }

    let n = rows.len() as f64;
    Ok(TrainingReport {
        rows: rows.len(),
        features: model.encoder().width(),
        tree_depth: model.tree().depth(),
        leaves: model.tree().leaf_count(),
        surplus_accuracy: agreements as f64 / n,
        mean_absolute_error: absolute_error / n,
    })
}
