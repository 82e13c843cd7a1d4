//! Prelude module for convenient imports
//!
//! Import everything you need with: `use dealsum::prelude::*;`

// Domain types
pub use crate::domain::{
    ChainClock, DealRecord, DomainError, EpochWindow, FilterCriteria, MarketDeal, TIB,
    to_tib_string,
};

// Aggregation types
pub use crate::aggregate::{AggregateError, AggregationReport, AggregationTable, TableRow};

// Engine types
pub use crate::engine::{DealProcessor, MatchedDeal, RunCounters, RunStats};

// IO types
pub use crate::io::{
    DecodeError, DecodeMode, Framing, RawRecord, RecordDecoder, RecordOrigin, RecordSource,
    RecordStream, ReportFormat, SourceError, write_report,
};

// Streaming types
pub use crate::streaming::{
    DealSink, ErrorPolicy, LogErrors, NdjsonSink, Pipeline, PipelineConfig, PipelineError,
    RunOutcome, SequentialRunner, SilentSkip, SinkError, StreamCombinator, TableSink, combine,
};

// App types
pub use crate::app::{AppError, Args, CliApp, RunConfig, execute, init_tracing};
