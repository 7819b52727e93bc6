pub mod inference;
pub mod output_record;
pub mod record;

pub use inference::{InferenceResult, ShiftedResult};
pub use output_record::OutputRecord;
pub use record::{FieldKind, FieldSpec, FieldValue, Record, Schema, DATE_FORMAT};
