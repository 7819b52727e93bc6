//! Model inference result types.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::output_record::OutputRecord;
use super::record::Record;

/// Raw output of a model run for one record.
///
/// Predictions are keyed by horizon: the number of steps ahead the
/// predicted value refers to, relative to the record that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Predicted target value per horizon.
    pub predictions: BTreeMap<usize, f64>,
    /// Anomaly score in [0, 1].
    pub anomaly_score: f64,
}

impl InferenceResult {
    pub fn new(predictions: BTreeMap<usize, f64>, anomaly_score: f64) -> Self {
        Self {
            predictions,
            anomaly_score,
        }
    }

    /// Result with a single prediction horizon.
    pub fn single(horizon: usize, predicted: f64, anomaly_score: f64) -> Self {
        let mut predictions = BTreeMap::new();
        predictions.insert(horizon, predicted);
        Self::new(predictions, anomaly_score)
    }

    /// Predicted value for a horizon, if the model emitted one.
    pub fn prediction(&self, horizon: usize) -> Option<f64> {
        self.predictions.get(&horizon).copied()
    }
}

/// A prediction re-aligned with the record it describes.
///
/// `aligned` is false during cold start (or when alignment was not
/// requested): the prediction then still refers to a future step and is
/// not comparable to `actual`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftedResult {
    pub timestamp: NaiveDateTime,
    pub actual: f64,
    pub prediction: f64,
    pub anomaly_score: f64,
    pub aligned: bool,
}

impl ShiftedResult {
    /// A lag-corrected result: `prediction` was made about this record.
    pub fn aligned(record: &Record, prediction: f64, anomaly_score: f64) -> Self {
        Self {
            timestamp: record.timestamp,
            actual: record.target,
            prediction,
            anomaly_score,
            aligned: true,
        }
    }

    /// A cold-start or pass-through result carrying the raw prediction.
    pub fn unaligned(record: &Record, prediction: f64, anomaly_score: f64) -> Self {
        Self {
            timestamp: record.timestamp,
            actual: record.target,
            prediction,
            anomaly_score,
            aligned: false,
        }
    }

    /// The tuple written to output sinks.
    pub fn to_output(&self) -> OutputRecord {
        OutputRecord {
            timestamp: self.timestamp,
            actual: self.actual,
            prediction: self.prediction,
            anomaly_score: self.anomaly_score,
        }
    }
}
