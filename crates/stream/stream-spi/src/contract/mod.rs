pub mod model_port;
pub mod output_sink;
pub mod record_source;

pub use model_port::ModelPort;
pub use output_sink::OutputSink;
pub use record_source::RecordSource;
