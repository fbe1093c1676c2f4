//! Historical events table
//!
//! Reads the comma-separated training file (header row required) into
//! `HistoricalEvent` rows and fingerprints its raw bytes so fitted models
//! can be cached per file version.

use crate::error::{PredictorError, Result};
use crate::models::HistoricalEvent;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Columns the training file must provide
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "building",
    "zone",
    "event_type",
    "day",
    "time",
    "rsvps",
    "expected_attendance",
];

/// Raw training file plus its content hash
#[derive(Debug, Clone)]
pub struct TrainingFile {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub content_hash: String,
}

impl TrainingFile {
    /// Read the training file from disk; missing or unreadable is `DataUnavailable`
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| PredictorError::unavailable(path, e))?;
        let content_hash = content_hash(&bytes);
        debug!(
            path = %path.display(),
            size_bytes = bytes.len(),
            content_hash = %content_hash,
            "Read historical events file"
        );
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
            content_hash,
        })
    }

    /// Parse all rows; an empty table is returned as an empty vec
    pub fn events(&self) -> Result<Vec<HistoricalEvent>> {
        parse_events(&self.path, &self.bytes)
    }
}

/// Lowercase hex SHA-256 of the raw file bytes
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Read and parse the historical events file in one step
pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<HistoricalEvent>> {
    TrainingFile::read(path)?.events()
}

/// Parse CSV bytes into events. `path` is only used for error messages.
pub fn parse_events(path: &Path, bytes: &[u8]) -> Result<Vec<HistoricalEvent>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut events = Vec::new();
    for result in reader.deserialize() {
        let event: HistoricalEvent = result.map_err(|source| PredictorError::MalformedRecord {
            path: path.to_path_buf(),
            source,
        })?;
        events.push(event);
    }

    debug!(path = %path.display(), rows = events.len(), "Parsed historical events");
    Ok(events)
}
