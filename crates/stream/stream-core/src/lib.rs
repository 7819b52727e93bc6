//! # stream-core
//!
//! Core implementations for the txstream pipeline: CSV record source,
//! inference shifting, rolling error metrics, output sinks, and the
//! sequential stream runner.

mod metrics;
mod model;
mod runner;
mod shifter;
mod sinks;
mod source;

pub use metrics::{MetricsWindow, PERCENTAGE_FLOOR};
pub use model::PriorValueModel;
pub use runner::{RunSummary, StreamRunner};
pub use shifter::InferenceShifter;
pub use sinks::{FileOutput, MemoryOutput};
pub use source::CsvRecordSource;
