use futures::{Stream, StreamExt};

use super::error::{ErrorPolicy, PipelineError};
use super::sink::DealSink;
use crate::engine::{DealProcessor, MatchedDeal, RunCounters, RunStats};
use crate::io::{RawRecord, SourceError};

/// What a finished run hands back: the sink's output and the final counters
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome<T> {
    pub output: T,
    pub stats: RunStats,
}

/// Read, decode, filter and sink on the calling task, one record at a time.
///
/// Deals reach the sink in input order.
pub struct SequentialRunner<P: ErrorPolicy> {
    processor: DealProcessor,
    error_policy: P,
}

impl<P: ErrorPolicy> SequentialRunner<P> {
    pub fn new(processor: DealProcessor, error_policy: P) -> Self {
        Self {
            processor,
            error_policy,
        }
    }

    pub async fn run<S, K>(&self, mut source: S, mut sink: K) -> Result<RunOutcome<K::Output>, PipelineError>
    where
        S: Stream<Item = Result<RawRecord, SourceError>> + Unpin,
        K: DealSink,
    {
        let counters = RunCounters::new();

        while let Some(item) = source.next().await {
            let Some(raw) = screen_source_item(item, &counters, &self.error_policy)? else {
                continue;
            };
            if let Some(deal) = process_record(&self.processor, &raw, &counters, &self.error_policy) {
                sink.accept(deal).await?;
            }
        }

        let output = sink.finish().await?;
        Ok(RunOutcome {
            output,
            stats: counters.snapshot(),
        })
    }
}

/// Pass records through, count and report skipped lines, surface fatal
/// source errors
pub(super) fn screen_source_item<P: ErrorPolicy>(
    item: Result<RawRecord, SourceError>,
    counters: &RunCounters,
    policy: &P,
) -> Result<Option<RawRecord>, SourceError> {
    match item {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            counters.record_skipped_line();
            policy.on_skipped_line(&e);
            Ok(None)
        }
    }
}

/// Decode and filter one record, keeping the counters current
pub(super) fn process_record<P: ErrorPolicy>(
    processor: &DealProcessor,
    raw: &RawRecord,
    counters: &RunCounters,
    policy: &P,
) -> Option<MatchedDeal> {
    counters.record_processed();
    match processor.process(raw) {
        Ok(Some(deal)) => {
            counters.record_matched();
            Some(deal)
        }
        Ok(None) => None,
        Err(e) => {
            counters.record_invalid();
            policy.on_invalid_record(&e);
            None
        }
    }
}
