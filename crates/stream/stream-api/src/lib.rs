//! Streaming Pipeline API
//!
//! Configuration types for the txstream pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use stream_spi::{Result, StreamError};

mod params;

pub use params::ModelParams;

// ============================================================================
// Metric Configuration
// ============================================================================

/// Raw error formulation used by a rolling metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Mean of absolute errors over the window.
    AbsoluteError,
    /// Mean of percentage errors over the window, falling back to the
    /// absolute error for samples whose actual value is near zero.
    PercentageError,
}

impl ErrorKind {
    /// Short label used in metric names.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::AbsoluteError => "aae",
            ErrorKind::PercentageError => "altMAPE",
        }
    }
}

/// Specification of one rolling error metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSpec {
    /// Target field the metric is computed over.
    pub field: String,
    /// Error formulation.
    pub error_kind: ErrorKind,
    /// Number of most recent samples retained (default: 1000).
    pub window: usize,
}

impl MetricSpec {
    pub fn new(field: impl Into<String>, error_kind: ErrorKind, window: usize) -> Self {
        Self {
            field: field.into(),
            error_kind,
            window,
        }
    }

    /// Stable name the metric is reported under.
    pub fn name(&self) -> String {
        format!(
            "{}:window={}:field={}",
            self.error_kind.label(),
            self.window,
            self.field
        )
    }
}

// ============================================================================
// Run Configuration
// ============================================================================

/// Top-level run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Dataset name; keys both the input file and the model params.
    pub dataset: String,
    /// Directory containing `<dataset>.csv`.
    pub data_dir: PathBuf,
    /// Directory containing `<dataset>_model_params.json`.
    pub model_params_dir: PathBuf,
    /// Realign predictions with the records they describe.
    pub align: bool,
    /// Horizon whose predictions are emitted (default: 1 step ahead).
    pub primary_horizon: usize,
    /// Rolling window size for error metrics (default: 1000).
    pub metric_window: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dataset: String::new(),
            data_dir: PathBuf::from("."),
            model_params_dir: PathBuf::from("model_params"),
            align: true,
            primary_horizon: 1,
            metric_window: 1000,
        }
    }
}

impl RunConfig {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            ..Self::default()
        }
    }

    /// Path of the input CSV for this dataset.
    pub fn input_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.csv", sanitize(&self.dataset)))
    }

    /// Path of the file-sink output CSV for this dataset.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_out.csv", sanitize(&self.dataset)))
    }

    /// Default metric set for a target field: absolute and percentage
    /// error over the configured window.
    pub fn default_metrics(&self, field: &str) -> Vec<MetricSpec> {
        vec![
            MetricSpec::new(field, ErrorKind::AbsoluteError, self.metric_window),
            MetricSpec::new(field, ErrorKind::PercentageError, self.metric_window),
        ]
    }
}

pub(crate) fn sanitize(dataset: &str) -> String {
    dataset.replace(' ', "_").replace('-', "_")
}

pub(crate) fn params_file_name(dataset: &str) -> String {
    format!("{}_model_params.json", sanitize(dataset))
}
