//! Food recommendation entry point
//!
//! `Recommender` owns an explicit `PredictorConfig` and the path of the
//! historical events file. Each call reads the file, fits (or reuses a
//! cached) model, predicts attendance, and formats the recommendation.
//! Without a cache every call refits from scratch.

use crate::config::PredictorConfig;
use crate::dataset::TrainingFile;
use crate::error::{PredictorError, Result};
use crate::models::{HistoricalEvent, PredictionRequest, PredictionResult};
use crate::observability::{PredictorMetrics, StructuredLogger};
use crate::predictor::{
    evaluate, AttendanceModel, AttendancePredictor, ModelCache, OutputFormatter, TrainingReport,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Produces food recommendations from the historical events file
pub struct Recommender {
    data_path: PathBuf,
    config: PredictorConfig,
    formatter: OutputFormatter,
    cache: Option<Arc<ModelCache>>,
    metrics: PredictorMetrics,
    logger: StructuredLogger,
}

impl Recommender {
    pub fn new(config: PredictorConfig, data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            formatter: OutputFormatter::with_config(&config),
            config,
            cache: None,
            metrics: PredictorMetrics::new(),
            logger: StructuredLogger::new("foodlens"),
        }
    }

    /// Load the configuration file once and build a recommender around it
    pub fn from_files(data_path: impl Into<PathBuf>, config_path: impl AsRef<Path>) -> Result<Self> {
        let config = PredictorConfig::load(config_path)?;
        Ok(Self::new(config, data_path))
    }

    /// Reuse fitted models while the training file is unchanged
    pub fn with_cache(mut self, cache: Arc<ModelCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn cache(&self) -> Option<&ModelCache> {
        self.cache.as_deref()
    }

    /// Recommend a food quantity for a planned event
    pub fn recommend(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        let start = Instant::now();
        let outcome = self.try_recommend(request);
        self.metrics
            .observe_prediction_latency(start.elapsed().as_secs_f64());

        match &outcome {
            Ok((result, version)) => {
                self.metrics.inc_recommendations();
                self.metrics.set_model_version(version);
                self.logger.log_recommendation(
                    &request.building,
                    request.event_type.as_str(),
                    request.rsvps,
                    request.planned_food,
                    result.predicted_attendance,
                    result.recommended_food,
                    result.reduction,
                    version,
                );
            }
            Err(e) => {
                self.metrics.inc_recommendation_errors();
                self.log_failure(e);
            }
        }

        outcome.map(|(result, _)| result)
    }

    fn try_recommend(&self, request: &PredictionRequest) -> Result<(PredictionResult, String)> {
        let model = self.load_model()?;
        let predicted = model.predict_attendance(request);
        let result = self.formatter.format(predicted, request);
        debug!(
            predicted_attendance = result.predicted_attendance,
            recommended_food = result.recommended_food,
            "Computed recommendation"
        );
        Ok((result, model.model_version().to_string()))
    }

    /// Fit (or fetch from cache) the model for the current training file
    pub fn load_model(&self) -> Result<Arc<AttendanceModel>> {
        let file = TrainingFile::read(&self.data_path)?;
        self.model_for(&file, None)
    }

    /// Fit on the current training file and score the model on it
    pub fn evaluate(&self) -> Result<(Arc<AttendanceModel>, TrainingReport)> {
        let file = TrainingFile::read(&self.data_path)?;
        let rows = file.events()?;
        let model = self.model_for(&file, Some(&rows))?;
        let report = evaluate(&model, &rows, &self.config)?;
        Ok((model, report))
    }

    /// `parsed` holds the file's rows when the caller already has them;
    /// otherwise they are parsed only if a fit is needed.
    fn model_for(
        &self,
        file: &TrainingFile,
        parsed: Option<&[HistoricalEvent]>,
    ) -> Result<Arc<AttendanceModel>> {
        let fit = || match parsed {
            Some(rows) => self.fit_rows(file, rows),
            None => self.fit_rows(file, &file.events()?),
        };

        match &self.cache {
            Some(cache) => {
                let (model, hit) = cache.get_or_try_insert_with(&file.content_hash, fit)?;
                self.metrics.record_cache_lookup(hit);
                debug!(content_hash = %file.content_hash, hit = hit, "Model cache lookup");
                Ok(model)
            }
            None => Ok(Arc::new(fit()?)),
        }
    }

    fn fit_rows(&self, file: &TrainingFile, rows: &[HistoricalEvent]) -> Result<AttendanceModel> {
        let start = Instant::now();
        let model = AttendanceModel::fit(rows)?.with_content_hash(&file.content_hash);
        let elapsed = start.elapsed();

        self.metrics.observe_fit_latency(elapsed.as_secs_f64());
        self.metrics.set_training_rows(rows.len());
        self.logger.log_model_fit(
            model.model_version(),
            rows.len(),
            model.encoder().width(),
            model.tree().depth(),
            model.tree().leaf_count(),
            elapsed.as_secs_f64() * 1000.0,
        );
        Ok(model)
    }

    fn log_failure(&self, error: &PredictorError) {
        match error {
            PredictorError::DataUnavailable { path, source } => self
                .logger
                .log_data_unavailable(&path.display().to_string(), &source.to_string()),
            other => self
                .logger
                .log_recommendation_failed(other.kind(), &other.to_string()),
        }
    }
}

/// Read both input files fresh, fit, and recommend in one call
pub fn recommend(
    data_path: impl Into<PathBuf>,
    config_path: impl AsRef<Path>,
    request: &PredictionRequest,
) -> Result<PredictionResult> {
    Recommender::from_files(data_path, config_path)?.recommend(request)
}
