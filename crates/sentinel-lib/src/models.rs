//! Core data models for the sentinel

use serde::{Deserialize, Serialize};

/// A single scalar metric reading.
///
/// The timestamp is carried on every sample even though the alerting path
/// only looks at the value; the export path and future windowing need it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Unix epoch seconds at which the backend produced the value
    pub timestamp: i64,
    /// The scalar metric value
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Binary classification decision for a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Normal,
    Anomaly,
}

impl Classification {
    pub fn is_anomaly(&self) -> bool {
        matches!(self, Classification::Anomaly)
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Normal => write!(f, "normal"),
            Classification::Anomaly => write!(f, "anomaly"),
        }
    }
}
