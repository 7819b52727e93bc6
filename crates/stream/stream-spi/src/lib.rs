//! Streaming Pipeline Service Provider Interface
//!
//! Defines the contracts and types for the transaction streaming pipeline.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{ModelPort, OutputSink, RecordSource};
pub use error::{Result, StreamError};
pub use model::{
    FieldKind, FieldSpec, FieldValue, InferenceResult, OutputRecord, Record, Schema,
    ShiftedResult, DATE_FORMAT,
};
