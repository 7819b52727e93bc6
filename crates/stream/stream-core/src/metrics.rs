//! Rolling error metrics over the aligned stream.

use std::collections::{BTreeMap, VecDeque};

use stream_api::{ErrorKind, MetricSpec};
use stream_spi::ShiftedResult;

/// Actual values below this magnitude switch the percentage error to
/// the absolute error for that sample, so near-zero actuals (e.g. a 0/1
/// class label) never blow the metric up.
pub const PERCENTAGE_FLOOR: f64 = 1.0;

/// One rolling error accumulator: a circular buffer of the last W
/// per-sample errors plus their running mean.
#[derive(Debug)]
struct MetricAccumulator {
    spec: MetricSpec,
    errors: VecDeque<f64>,
}

impl MetricAccumulator {
    fn new(spec: MetricSpec) -> Self {
        let capacity = spec.window;
        Self {
            spec,
            errors: VecDeque::with_capacity(capacity),
        }
    }

    fn sample_error(&self, actual: f64, prediction: f64) -> f64 {
        let absolute = (actual - prediction).abs();
        match self.spec.error_kind {
            ErrorKind::AbsoluteError => absolute,
            ErrorKind::PercentageError => {
                if actual.abs() < PERCENTAGE_FLOOR {
                    absolute
                } else {
                    absolute / actual.abs() * 100.0
                }
            }
        }
    }

    fn push(&mut self, actual: f64, prediction: f64) {
        let error = self.sample_error(actual, prediction);
        if self.errors.len() == self.spec.window {
            self.errors.pop_front();
        }
        self.errors.push_back(error);
    }

    fn aggregate(&self) -> f64 {
        if self.errors.is_empty() {
            return 0.0;
        }
        self.errors.iter().sum::<f64>() / self.errors.len() as f64
    }

    fn len(&self) -> usize {
        self.errors.len()
    }
}

/// Maintains a set of named rolling error metrics over the
/// (actual, prediction) stream.
///
/// State is reset only at construction; nothing is persisted.
#[derive(Debug)]
pub struct MetricsWindow {
    accumulators: Vec<MetricAccumulator>,
}

impl MetricsWindow {
    pub fn new(specs: Vec<MetricSpec>) -> Self {
        Self {
            accumulators: specs.into_iter().map(MetricAccumulator::new).collect(),
        }
    }

    /// Fold one aligned result into every accumulator and return the
    /// current aggregates.
    pub fn update(&mut self, shifted: &ShiftedResult) -> BTreeMap<String, f64> {
        for acc in &mut self.accumulators {
            acc.push(shifted.actual, shifted.prediction);
        }
        self.snapshot()
    }

    /// Read-only snapshot of every metric's current aggregate.
    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        self.accumulators
            .iter()
            .map(|acc| (acc.spec.name(), acc.aggregate()))
            .collect()
    }

    /// Number of samples currently buffered per metric.
    pub fn sample_counts(&self) -> BTreeMap<String, usize> {
        self.accumulators
            .iter()
            .map(|acc| (acc.spec.name(), acc.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use stream_spi::DATE_FORMAT;

    fn shifted(actual: f64, prediction: f64) -> ShiftedResult {
        let ts = NaiveDateTime::parse_from_str("2017-08-24 03:19:52", DATE_FORMAT).unwrap();
        ShiftedResult {
            timestamp: ts,
            actual,
            prediction,
            anomaly_score: 0.0,
            aligned: true,
        }
    }

    fn aae_spec(window: usize) -> MetricSpec {
        MetricSpec::new("class", ErrorKind::AbsoluteError, window)
    }

    #[test]
    fn test_mean_absolute_error() {
        let mut window = MetricsWindow::new(vec![aae_spec(10)]);
        window.update(&shifted(10.0, 8.0)); // err 2
        let snap = window.update(&shifted(10.0, 14.0)); // err 4
        let value = snap["aae:window=10:field=class"];
        assert!((value - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_holds_exactly_w_entries() {
        let w = 5;
        let mut window = MetricsWindow::new(vec![aae_spec(w)]);
        for i in 0..w + 3 {
            window.update(&shifted(i as f64, 0.0));
            let count = window.sample_counts()["aae:window=5:field=class"];
            assert_eq!(count, (i + 1).min(w));
        }
    }

    #[test]
    fn test_one_more_sample_evicts_exactly_the_oldest() {
        // Window of 2: after [1, 100], mean is 50.5; pushing 100 evicts
        // the 1 and leaves [100, 100].
        let mut window = MetricsWindow::new(vec![aae_spec(2)]);
        window.update(&shifted(1.0, 0.0));
        let snap = window.update(&shifted(100.0, 0.0));
        assert!((snap["aae:window=2:field=class"] - 50.5).abs() < 1e-12);
        let snap = window.update(&shifted(100.0, 0.0));
        assert!((snap["aae:window=2:field=class"] - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_percentage_error_above_floor() {
        let spec = MetricSpec::new("class", ErrorKind::PercentageError, 10);
        let mut window = MetricsWindow::new(vec![spec]);
        let snap = window.update(&shifted(10.0, 8.0));
        // |10 - 8| / 10 * 100 = 20%
        assert!((snap["altMAPE:window=10:field=class"] - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_percentage_error_zero_actual_is_finite() {
        let spec = MetricSpec::new("class", ErrorKind::PercentageError, 10);
        let mut window = MetricsWindow::new(vec![spec]);
        let snap = window.update(&shifted(0.0, 1.0));
        let value = snap["altMAPE:window=10:field=class"];
        assert!(value.is_finite());
        assert!(!value.is_nan());
        // Degrades to the absolute error for that sample.
        assert!((value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_window_reports_zero() {
        let window = MetricsWindow::new(vec![aae_spec(10)]);
        assert_eq!(window.snapshot()["aae:window=10:field=class"], 0.0);
    }

    #[test]
    fn test_multiple_specs_tracked_independently() {
        let specs = vec![
            MetricSpec::new("class", ErrorKind::AbsoluteError, 10),
            MetricSpec::new("class", ErrorKind::PercentageError, 10),
        ];
        let mut window = MetricsWindow::new(specs);
        let snap = window.update(&shifted(10.0, 5.0));
        assert_eq!(snap.len(), 2);
        assert!((snap["aae:window=10:field=class"] - 5.0).abs() < 1e-12);
        assert!((snap["altMAPE:window=10:field=class"] - 50.0).abs() < 1e-12);
    }
}
