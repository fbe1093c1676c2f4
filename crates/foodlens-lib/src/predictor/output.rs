//! Recommendation output formatting
//!
//! Turns a predicted attendance into a food quantity with the configured
//! safety buffer, the reduction against the caller's plan, and the
//! explanation lines shown to organizers.

use crate::config::{PredictorConfig, DEFAULT_FOOD_BUFFER};
use crate::models::{PredictionRequest, PredictionResult};

/// Formats a predicted attendance into a `PredictionResult`
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    food_buffer: u32,
}

impl OutputFormatter {
    pub fn new() -> Self {
        Self {
            food_buffer: DEFAULT_FOOD_BUFFER,
        }
    }

    pub fn with_config(config: &PredictorConfig) -> Self {
        Self {
            food_buffer: config.food_buffer,
        }
    }

    pub fn food_buffer(&self) -> u32 {
        self.food_buffer
    }

    /// Build the result for an already-truncated attendance prediction
    pub fn format(&self, predicted_attendance: u32, request: &PredictionRequest) -> PredictionResult {
        let recommended_food = self.recommended_food(predicted_attendance, request.rsvps);
        let reduction = request.planned_food as i64 - recommended_food as i64;

        PredictionResult {
            predicted_attendance,
            recommended_food,
            reduction,
            explanation: vec![
                format!(
                    "Predicted attendance: ~{} based on similar past events.",
                    predicted_attendance
                ),
                format!(
                    "RSVPs: {}. Planned food: {}.",
                    request.rsvps, request.planned_food
                ),
                format!(
                    "Model recommends ordering {} to cover buffer while reducing surplus risk.",
                    recommended_food
                ),
            ],
        }
    }

    /// max(rsvps, predicted + buffer); never below the rsvp count
    pub fn recommended_food(&self, predicted_attendance: u32, rsvps: u32) -> u32 {
        rsvps.max(predicted_attendance.saturating_add(self.food_buffer))
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new()
    }
}
