//! Record source trait definition.

use crate::error::Result;
use crate::model::{Record, Schema};

/// An ordered, finite, forward-only source of input records.
///
/// Not restartable mid-run. A malformed row is fatal: skipping it would
/// desynchronize the model's temporal state downstream.
pub trait RecordSource: Send {
    /// Declared column layout of the stream.
    fn schema(&self) -> &Schema;

    /// Produce the next record, or `Ok(None)` at end of stream.
    fn next_record(&mut self) -> Result<Option<Record>>;
}
