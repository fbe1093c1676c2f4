//! FoodLens predictor HTTP service
//!
//! Exposes `recommend` to the web frontend plus health and metrics
//! endpoints for the deployment.

pub mod api;
pub mod config;

pub use api::{create_router, serve, ApiError, AppState};
pub use crate::config::ServerConfig;
