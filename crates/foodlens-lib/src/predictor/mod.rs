//! Attendance prediction engine

mod cache;
mod evaluation;
mod features;
mod inference;
mod output;
mod tree;

pub use cache::{CacheStats, ModelCache, DEFAULT_CACHE_CAPACITY};
pub use evaluation::{evaluate, TrainingReport};
pub use features::{EventFeatures, FeatureEncoder, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};
pub use inference::{truncate_attendance, AttendanceModel, UNVERSIONED};
pub use output::OutputFormatter;
pub use tree::{DecisionTreeRegressor, Node, TreeParams, DEFAULT_MAX_DEPTH};

use crate::error::Result;
use crate::models::{HistoricalEvent, PredictionRequest};

/// Trait for attendance prediction implementations
pub trait AttendancePredictor: Send + Sync {
    /// Predicted attendance for a request, truncated to an integer
    fn predict_attendance(&self, request: &PredictionRequest) -> u32;

    /// Version label of the fitted model
    fn model_version(&self) -> &str;
}

/// Fit a model on the full historical table
pub fn fit(rows: &[HistoricalEvent]) -> Result<AttendanceModel> {
    AttendanceModel::fit(rows)
}

/// Predict attendance for a request with an already-fitted model
pub fn predict(model: &impl AttendancePredictor, request: &PredictionRequest) -> u32 {
    model.predict_attendance(request)
}
