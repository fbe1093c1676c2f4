//! Error types for the attendance predictor

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the predictor library
pub type Result<T> = std::result::Result<T, PredictorError>;

/// Fatal errors raised while loading data, fitting, or recommending.
///
/// Categories that were never seen during training are not an error:
/// they encode to an all-zero block and the tree simply gets no signal
/// from that column.
#[derive(Debug, Error)]
pub enum PredictorError {
    /// Historical-data file or configuration file is missing or unreadable
    #[error("data unavailable: {}: {source}", path.display())]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Historical table has a header but no rows
    #[error("no training data: historical table is empty")]
    EmptyTrainingSet,

    /// A row of the historical table could not be parsed
    #[error("malformed record in {}: {source}", path.display())]
    MalformedRecord {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Configuration document could not be parsed
    #[error("invalid predictor configuration: {0}")]
    InvalidConfig(#[from] config::ConfigError),
}

impl PredictorError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PredictorError::DataUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means an input file is missing or unreadable
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, PredictorError::DataUnavailable { .. })
    }

    /// Short machine-readable name for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            PredictorError::DataUnavailable { .. } => "data_unavailable",
            PredictorError::EmptyTrainingSet => "empty_training_set",
            PredictorError::MalformedRecord { .. } => "malformed_record",
            PredictorError::InvalidConfig(_) => "invalid_config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_unavailable_names_path() {
        let err = PredictorError::unavailable(
            "model/past_events.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("model/past_events.csv"), "message was {}", msg);
        assert!(err.is_data_unavailable());
        assert_eq!(err.kind(), "data_unavailable");
    }

    #[test]
    fn test_empty_training_set_kind() {
        let err = PredictorError::EmptyTrainingSet;
        assert!(!err.is_data_unavailable());
        assert_eq!(err.kind(), "empty_training_set");
        assert!(err.to_string().contains("no training data"));
    }
}
