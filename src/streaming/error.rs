use std::io;

use thiserror::Error;
use tracing::warn;

use crate::aggregate::AggregateError;
use crate::io::{DecodeError, SourceError};

/// How non-fatal errors are surfaced.
///
/// Policies only observe: the record is already counted and skipped by the
/// time a policy sees it, and no policy can abort a run.
pub trait ErrorPolicy: Clone + Send + Sync + 'static {
    /// An NDJSON line that could not be read
    fn on_skipped_line(&self, error: &SourceError);

    /// A record that failed to decode
    fn on_invalid_record(&self, error: &DecodeError);
}

/// Log each skipped record at warn level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrors;

impl ErrorPolicy for LogErrors {
    fn on_skipped_line(&self, error: &SourceError) {
        warn!(%error, "Skipping line");
    }

    fn on_invalid_record(&self, error: &DecodeError) {
        warn!(%error, "Skipping record");
    }
}

/// Silent error policy - skip errors without logging
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSkip;

impl ErrorPolicy for SilentSkip {
    fn on_skipped_line(&self, _error: &SourceError) {}

    fn on_invalid_record(&self, _error: &DecodeError) {}
}

/// Errors raised by a sink while consuming matched deals
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Fatal errors that end a run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
