//! Output tuple written to sinks.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The unit written to any output sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub timestamp: NaiveDateTime,
    pub actual: f64,
    pub prediction: f64,
    pub anomaly_score: f64,
}

impl OutputRecord {
    pub fn new(timestamp: NaiveDateTime, actual: f64, prediction: f64, anomaly_score: f64) -> Self {
        Self {
            timestamp,
            actual,
            prediction,
            anomaly_score,
        }
    }
}
