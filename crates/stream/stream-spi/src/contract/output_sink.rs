//! Output sink trait definition.

use crate::error::Result;
use crate::model::OutputRecord;

/// Polymorphic destination for finalized result tuples.
///
/// Writes arrive in strict timestamp order; that is a caller contract,
/// not validated here. `close` must be called (best-effort on abort) so
/// buffered output is not lost.
pub trait OutputSink: Send {
    /// Append one result tuple.
    fn write(&mut self, record: &OutputRecord) -> Result<()>;

    /// Flush and release the sink's resources.
    fn close(&mut self) -> Result<()>;
}
