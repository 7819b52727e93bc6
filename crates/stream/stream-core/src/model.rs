//! Built-in reference model.
//!
//! The pipeline treats the predictive model as an opaque external
//! service. This module ships one self-contained implementation so the
//! binary runs end to end without that service: it predicts the next
//! target value to equal the current one and scores anomalies with a
//! rolling z-score of the target.

use std::collections::VecDeque;

use stream_api::ModelParams;
use stream_spi::{InferenceResult, ModelPort, Record, Result};

const DEFAULT_ANOMALY_WINDOW: usize = 100;
const DEFAULT_ANOMALY_THRESHOLD: f64 = 3.0;

/// Prior-value predictor with z-score anomaly scoring.
#[derive(Debug)]
pub struct PriorValueModel {
    horizon: usize,
    window: VecDeque<f64>,
    capacity: usize,
    threshold: f64,
}

impl PriorValueModel {
    pub fn new(horizon: usize) -> Self {
        Self {
            horizon,
            window: VecDeque::with_capacity(DEFAULT_ANOMALY_WINDOW),
            capacity: DEFAULT_ANOMALY_WINDOW,
            threshold: DEFAULT_ANOMALY_THRESHOLD,
        }
    }

    /// Build from a params blob; honors optional `anomalyWindow` and
    /// `anomalyThreshold` entries, everything else is ignored here.
    pub fn from_params(params: &ModelParams, horizon: usize) -> Self {
        let mut model = Self::new(horizon);
        if let Some(window) = params.get_f64("anomalyWindow") {
            if window >= 2.0 {
                model.capacity = window as usize;
            }
        }
        if let Some(threshold) = params.get_f64("anomalyThreshold") {
            if threshold > 0.0 {
                model.threshold = threshold;
            }
        }
        model
    }

    /// Z-score of `value` against the rolling window, squashed to [0, 1].
    fn anomaly_score(&self, value: f64) -> f64 {
        if self.window.len() < 2 {
            return 0.0;
        }
        let n = self.window.len() as f64;
        let mean = self.window.iter().sum::<f64>() / n;
        let std_dev =
            (self.window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();
        if std_dev == 0.0 {
            return 0.0;
        }
        let z = (value - mean) / std_dev;
        (z.abs() / self.threshold).min(1.0)
    }
}

impl ModelPort for PriorValueModel {
    fn run(&mut self, record: &Record) -> Result<InferenceResult> {
        let score = self.anomaly_score(record.target);

        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(record.target);

        Ok(InferenceResult::single(self.horizon, record.target, score))
    }
}
