pub mod combine;
pub mod error;
pub mod pipeline;
pub mod single;
pub mod sink;

// Re-export commonly used types
pub use combine::{StreamCombinator, combine};
pub use error::{ErrorPolicy, LogErrors, PipelineError, SilentSkip, SinkError};
pub use pipeline::{DEFAULT_QUEUE_DEPTH, Pipeline, PipelineConfig};
pub use single::{RunOutcome, SequentialRunner};
pub use sink::{DealSink, NdjsonSink, TableSink};
