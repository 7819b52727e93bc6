//! Model port trait definition.

use crate::error::Result;
use crate::model::{InferenceResult, Record};

/// Boundary to the external predictive model.
///
/// The model accumulates internal temporal state across calls, so
/// `run` must be invoked exactly once per record, in record order.
/// Failures are fatal for the run and must not be retried: a retry
/// would double-apply state for that record.
pub trait ModelPort: Send {
    /// Feed one record through the model.
    fn run(&mut self, record: &Record) -> Result<InferenceResult>;
}
