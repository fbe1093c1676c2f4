//! Feature encoding for the attendance model
//!
//! Turns an event into a dense feature row: one one-hot block per
//! categorical column (building, zone, event_type, day, time) followed by
//! the raw rsvp count. Each block's vocabulary is the sorted set of values
//! seen during fitting, whether or not they are one of the known labels.
//! Values outside the vocabulary encode to an all-zero block.

use crate::models::{HistoricalEvent, PredictionRequest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Categorical columns, in encoding order
pub const CATEGORICAL_COLUMNS: [&str; 5] = ["building", "zone", "event_type", "day", "time"];

/// Numeric passthrough columns, appended after the one-hot blocks
pub const NUMERIC_COLUMNS: [&str; 1] = ["rsvps"];

/// Anything that carries the model's input features
pub trait EventFeatures {
    /// Category keys in `CATEGORICAL_COLUMNS` order; `None` means a blank value
    fn categories(&self) -> [Option<&str>; 5];

    fn rsvps(&self) -> u32;
}

impl EventFeatures for HistoricalEvent {
    fn categories(&self) -> [Option<&str>; 5] {
        [
            Some(self.building.trim()).filter(|b| !b.is_empty()),
            self.zone.category(),
            self.event_type.category(),
            self.day.category(),
            self.time.category(),
        ]
    }

    fn rsvps(&self) -> u32 {
        self.rsvps
    }
}

impl EventFeatures for PredictionRequest {
    fn categories(&self) -> [Option<&str>; 5] {
        [
            Some(self.building.trim()).filter(|b| !b.is_empty()),
            self.zone.category(),
            self.event_type.category(),
            self.day.category(),
            self.time.category(),
        ]
    }

    fn rsvps(&self) -> u32 {
        self.rsvps
    }
}

/// One-hot encoder with a passthrough numeric tail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoder {
    vocabularies: Vec<Vec<String>>,
}

impl FeatureEncoder {
    /// Learn the per-column vocabularies from training rows
    pub fn fit<E: EventFeatures>(rows: &[E]) -> Self {
        let mut sets: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); CATEGORICAL_COLUMNS.len()];
        for row in rows {
            for (set, category) in sets.iter_mut().zip(row.categories()) {
                if let Some(category) = category {
                    set.insert(category);
                }
            }
        }

        Self {
            vocabularies: sets
                .into_iter()
                .map(|set| set.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    /// Total number of encoded features
    pub fn width(&self) -> usize {
        self.vocabularies.iter().map(Vec::len).sum::<usize>() + NUMERIC_COLUMNS.len()
    }

    /// Known categories of the given column, sorted
    pub fn vocabulary(&self, column: &str) -> Option<&[String]> {
        CATEGORICAL_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|idx| self.vocabularies[idx].as_slice())
    }

    /// Encode a single event into a feature row of length `width()`
    pub fn encode<E: EventFeatures>(&self, row: &E) -> Vec<f64> {
        let mut features = Vec::with_capacity(self.width());
        for (vocabulary, category) in self.vocabularies.iter().zip(row.categories()) {
            let hot = category.and_then(|c| {
                vocabulary
                    .binary_search_by(|known| known.as_str().cmp(c))
                    .ok()
            });
            features.extend((0..vocabulary.len()).map(|i| if Some(i) == hot { 1.0 } else { 0.0 }));
        }
        features.push(row.rsvps() as f64);
        features
    }

    /// Encode many rows at once
    pub fn encode_all<E: EventFeatures>(&self, rows: &[E]) -> Vec<Vec<f64>> {
        rows.iter().map(|row| self.encode(row)).collect()
    }

    /// Feature names in encoding order (`cat__zone_north`, ..., `num__rsvps`)
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.width());
        for (column, vocabulary) in CATEGORICAL_COLUMNS.iter().zip(&self.vocabularies) {
            names.extend(vocabulary.iter().map(|value| format!("cat__{}_{}", column, value)));
        }
        names.extend(NUMERIC_COLUMNS.iter().map(|column| format!("num__{}", column)));
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(building: &str, zone: &str, event_type: &str, rsvps: u32) -> HistoricalEvent {
        HistoricalEvent {
            building: building.to_string(),
            zone: zone.into(),
            event_type: event_type.into(),
            day: "wed".into(),
            time: "18:00".into(),
            rsvps,
            expected_attendance: 100.0,
        }
    }

    #[test]
    fn test_vocabulary_is_sorted_and_deduplicated() {
        let rows = vec![
            event("Royce Hall", "south", "fair", 10),
            event("Boelter Hall", "north", "club", 20),
            event("Royce Hall", "north", "club", 30),
        ];
        let encoder = FeatureEncoder::fit(&rows);

        assert_eq!(
            encoder.vocabulary("building").unwrap(),
            &["Boelter Hall".to_string(), "Royce Hall".to_string()]
        );
        assert_eq!(
            encoder.vocabulary("zone").unwrap(),
            &["north".to_string(), "south".to_string()]
        );
        // 2 buildings + 2 zones + 2 types + 1 day + 1 time + rsvps
        assert_eq!(encoder.width(), 9);
    }

    #[test]
    fn test_encode_sets_one_indicator_per_block() {
        let rows = vec![
            event("Royce Hall", "south", "fair", 10),
            event("Boelter Hall", "north", "club", 20),
        ];
        let encoder = FeatureEncoder::fit(&rows);
        let encoded = encoder.encode(&rows[0]);

        assert_eq!(encoded, vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 10.0]);
    }

    #[test]
    fn test_unknown_category_encodes_to_zero_block() {
        let rows = vec![event("Boelter Hall", "north", "club", 20)];
        let encoder = FeatureEncoder::fit(&rows);

        let request = PredictionRequest::new("Pauley Pavilion", "downtown", "club", "wed", "18:00", 5, 5);
        let encoded = encoder.encode(&request);

        assert_eq!(encoded.len(), encoder.width());
        // building and zone blocks are zero, event_type/day/time hit
        assert_eq!(encoded, vec![0.0, 0.0, 1.0, 1.0, 1.0, 5.0]);
    }

    #[test]
    fn test_off_list_values_seen_in_training_enter_vocabulary() {
        let rows = vec![
            event("Boelter Hall", "central", "club", 20),
            event("Boelter Hall", "north", "hackathon", 20),
        ];
        let encoder = FeatureEncoder::fit(&rows);

        assert_eq!(
            encoder.vocabulary("zone").unwrap(),
            &["central".to_string(), "north".to_string()]
        );
        assert_eq!(
            encoder.vocabulary("event_type").unwrap(),
            &["club".to_string(), "hackathon".to_string()]
        );

        // A request using the same off-list value hits its indicator
        let request = PredictionRequest::new("Boelter Hall", "central", "gala", "wed", "18:00", 5, 5);
        let encoded = encoder.encode(&request);
        // building, zone[central, north], event_type[club, hackathon], day, time, rsvps
        assert_eq!(encoded, vec![1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 5.0]);
    }

    #[test]
    fn test_feature_names_follow_encoding_order() {
        let rows = vec![event("Boelter Hall", "north", "club", 20)];
        let encoder = FeatureEncoder::fit(&rows);

        assert_eq!(
            encoder.feature_names(),
            vec![
                "cat__building_Boelter Hall",
                "cat__zone_north",
                "cat__event_type_club",
                "cat__day_wed",
                "cat__time_18:00",
                "num__rsvps",
            ]
        );
    }

    #[test]
    fn test_empty_fit_keeps_numeric_tail() {
        let encoder = FeatureEncoder::fit::<HistoricalEvent>(&[]);
        assert_eq!(encoder.width(), 1);
        assert_eq!(encoder.feature_names(), vec!["num__rsvps"]);
    }
}
