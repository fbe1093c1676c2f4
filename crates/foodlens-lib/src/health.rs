//! Health tracking for the predictor service
//!
//! The service depends on two files (the historical events table and the
//! predictor configuration) and on fitting succeeding against them. Each
//! is a named component; the overall status is the worst component status.

use crate::error::PredictorError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Component names for health tracking
pub mod components {
    /// Historical events CSV
    pub const DATASET: &str = "dataset";
    /// Predictor configuration JSON
    pub const CONFIG: &str = "config";
    /// Model fitting and recommendation
    pub const PREDICTOR: &str = "predictor";
}

/// Health status of a component, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    /// Recommendations fail but the inputs are present
    Degraded,
    Unhealthy,
}

impl ComponentStatus {
    /// Healthy or degraded components still answer requests
    pub fn is_operational(&self) -> bool {
        *self != ComponentStatus::Unhealthy
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl ComponentHealth {
    fn with_status(status: ComponentStatus, message: Option<String>) -> Self {
        Self {
            status,
            message,
            checked_at: Utc::now(),
        }
    }

    pub fn healthy() -> Self {
        Self::with_status(ComponentStatus::Healthy, None)
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self::with_status(ComponentStatus::Degraded, Some(message.into()))
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::with_status(ComponentStatus::Unhealthy, Some(message.into()))
    }

    /// Healthy if `path` is a regular file the process can stat
    pub fn probe_file(path: &Path) -> Self {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => Self::healthy(),
            Ok(_) => Self::unhealthy(format!("{} is not a regular file", path.display())),
            Err(e) => Self::unhealthy(format!("{}: {}", path.display(), e)),
        }
    }
}

/// Body of the liveness endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub components: BTreeMap<String, ComponentHealth>,
}

impl HealthResponse {
    /// Worst status across components; no components counts as healthy
    pub fn compute_status(components: &BTreeMap<String, ComponentHealth>) -> ComponentStatus {
        components
            .values()
            .map(|c| c.status)
            .max()
            .unwrap_or(ComponentStatus::Healthy)
    }
}

/// Body of the readiness endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Default)]
struct RegistryState {
    components: BTreeMap<String, ComponentHealth>,
    ready: bool,
}

/// Shared, cloneable view of component health and readiness
#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `name` as healthy
    pub async fn register(&self, name: &str) {
        self.update(name, ComponentHealth::healthy()).await;
    }

    pub async fn update(&self, name: &str, health: ComponentHealth) {
        self.state
            .write()
            .await
            .components
            .insert(name.to_string(), health);
    }

    pub async fn set_healthy(&self, name: &str) {
        self.update(name, ComponentHealth::healthy()).await;
    }

    pub async fn set_degraded(&self, name: &str, message: impl Into<String>) {
        self.update(name, ComponentHealth::degraded(message)).await;
    }

    pub async fn set_unhealthy(&self, name: &str, message: impl Into<String>) {
        self.update(name, ComponentHealth::unhealthy(message)).await;
    }

    /// Stat the dataset and configuration files
    pub async fn probe_inputs(&self, data_path: &Path, config_path: &Path) {
        let dataset = ComponentHealth::probe_file(data_path);
        let config = ComponentHealth::probe_file(config_path);

        let mut state = self.state.write().await;
        state
            .components
            .insert(components::DATASET.to_string(), dataset);
        state.components.insert(components::CONFIG.to_string(), config);
    }

    /// Fold the outcome of one recommendation into component health.
    ///
    /// Success clears both the dataset and predictor. A missing or unreadable
    /// file marks the dataset unhealthy; any other failure leaves the inputs
    /// alone and degrades the predictor.
    pub async fn record_recommendation<T>(&self, outcome: &Result<T, PredictorError>) {
        match outcome {
            Ok(_) => {
                let mut state = self.state.write().await;
                for name in [components::DATASET, components::PREDICTOR] {
                    state
                        .components
                        .insert(name.to_string(), ComponentHealth::healthy());
                }
            }
            Err(e) if e.is_data_unavailable() => {
                self.set_unhealthy(components::DATASET, e.to_string()).await
            }
            Err(e) => self.set_degraded(components::PREDICTOR, e.to_string()).await,
        }
    }

    pub async fn set_ready(&self, ready: bool) {
        self.state.write().await.ready = ready;
    }

    pub async fn health(&self) -> HealthResponse {
        let components = self.state.read().await.components.clone();
        HealthResponse {
            status: HealthResponse::compute_status(&components),
            components,
        }
    }

    /// Not ready until startup completes, or while any component is unhealthy
    pub async fn readiness(&self) -> ReadinessResponse {
        let state = self.state.read().await;

        if !state.ready {
            return ReadinessResponse {
                ready: false,
                reason: Some("Predictor not yet initialized".to_string()),
            };
        }

        let unhealthy: Vec<&str> = state
            .components
            .iter()
            .filter(|(_, c)| c.status == ComponentStatus::Unhealthy)
            .map(|(name, _)| name.as_str())
            .collect();

        if unhealthy.is_empty() {
            ReadinessResponse {
                ready: true,
                reason: None,
            }
        } else {
            ReadinessResponse {
                ready: false,
                reason: Some(format!("Unhealthy: {}", unhealthy.join(", "))),
            }
        }
    }
}
