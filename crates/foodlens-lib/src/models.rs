//! Core data models for the attendance predictor

use serde::{de, Deserialize, Deserializer, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Declares a closed categorical domain with an `Other` bucket.
///
/// Parsing trims whitespace and matches labels case-insensitively; anything
/// else lands in `Other` with the trimmed raw text.
macro_rules! categorical_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// Value outside the known domain, kept verbatim
            Other(String),
        }

        impl $name {
            /// Canonical labels of the known values, in declaration order
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Other(raw) => raw.as_str(),
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }

            /// Category key for one-hot encoding.
            ///
            /// `Other` values use their raw text, so values outside the known
            /// labels still encode when they were seen during fitting. Only a
            /// blank value has no category.
            pub fn category(&self) -> Option<&str> {
                Some(self.as_str()).filter(|c| !c.is_empty())
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let trimmed = raw.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($label) {
                        return Ok($name::$variant);
                    }
                )+
                Ok($name::Other(trimmed.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                match raw.parse() {
                    Ok(value) => value,
                    Err(never) => match never {},
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                $name::from(raw.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

categorical_enum! {
    /// Campus zone the building sits in
    Zone {
        North => "north",
        South => "south",
        East => "east",
        West => "west",
    }
}

categorical_enum! {
    /// Kind of event hosting the food
    EventType {
        Club => "club",
        Seminar => "seminar",
        Fair => "fair",
        CareerFair => "career_fair",
    }
}

categorical_enum! {
    /// Weekday the event runs on
    Weekday {
        Mon => "mon",
        Tue => "tue",
        Wed => "wed",
        Thu => "thu",
        Fri => "fri",
    }
}

categorical_enum! {
    /// Fixed start-time slots offered by the event form
    TimeSlot {
        Morning => "09:00",
        Midday => "12:00",
        Afternoon => "15:00",
        Evening => "18:00",
        Night => "20:00",
    }
}

/// A past event with its observed attendance (one row of training data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEvent {
    pub building: String,
    pub zone: Zone,
    pub event_type: EventType,
    pub day: Weekday,
    pub time: TimeSlot,
    pub rsvps: u32,
    /// Observed headcount; finite and non-negative
    #[serde(deserialize_with = "attendance_label")]
    pub expected_attendance: f64,
}

fn attendance_label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(de::Error::custom(format!(
            "expected_attendance must be a finite non-negative number, got {}",
            value
        )))
    }
}

/// A planned event to produce a food recommendation for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub building: String,
    pub zone: Zone,
    pub event_type: EventType,
    pub day: Weekday,
    pub time: TimeSlot,
    pub rsvps: u32,
    pub planned_food: u32,
}

impl PredictionRequest {
    pub fn new(
        building: impl Into<String>,
        zone: impl Into<Zone>,
        event_type: impl Into<EventType>,
        day: impl Into<Weekday>,
        time: impl Into<TimeSlot>,
        rsvps: u32,
        planned_food: u32,
    ) -> Self {
        Self {
            building: building.into(),
            zone: zone.into(),
            event_type: event_type.into(),
            day: day.into(),
            time: time.into(),
            rsvps,
            planned_food,
        }
    }
}

/// Recommendation returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_attendance: u32,
    /// Always at least the request's rsvps
    pub recommended_food: u32,
    /// planned_food minus recommended_food; negative means "order more"
    pub reduction: i64,
    pub explanation: Vec<String>,
}
