//! FoodLens attendance predictor library
//!
//! This crate provides the core functionality for:
//! - Loading the historical events table and predictor configuration
//! - Fitting a one-hot + decision-tree attendance model
//! - Turning predicted attendance into a buffered food recommendation
//! - Caching fitted models by training-data content hash
//! - Health checks and observability

pub mod config;
pub mod dataset;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod recommender;

pub use crate::config::PredictorConfig;
pub use error::{PredictorError, Result};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{PredictorMetrics, StructuredLogger};
pub use recommender::{recommend, Recommender};
