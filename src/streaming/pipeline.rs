use std::num::NonZeroUsize;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::debug;

use super::error::{ErrorPolicy, PipelineError, SinkError};
use super::single::{RunOutcome, process_record, screen_source_item};
use super::sink::DealSink;
use crate::engine::{DealProcessor, MatchedDeal, RunCounters};
use crate::io::{RawRecord, SourceError};

/// Records buffered per worker lane before the producer waits
pub const DEFAULT_QUEUE_DEPTH: usize = 16;

/// Worker count and queue sizing for a concurrent run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    workers: usize,
    queue_depth: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

impl PipelineConfig {
    /// Set number of decode workers (at least 1)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set per-lane queue depth (at least 1)
    pub fn with_queue_depth(mut self, depth: usize) -> Self {
        self.queue_depth = depth.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn queue_depth(&self) -> usize {
        self.queue_depth
    }

    /// Capacity of the queue between the workers and the sink
    pub fn output_capacity(&self) -> usize {
        self.workers * self.queue_depth
    }
}

/// Producer -> N decode/filter workers -> one sink, over bounded queues.
///
/// The producer feeds the workers round-robin, one bounded lane each. Every
/// worker forwards matches to a shared bounded output queue drained by the
/// sink. Shutdown runs in a fixed order:
///
/// 1. the producer reaches the end of input (or a fatal error) and drops
///    every lane
/// 2. each worker drains its lane and exits, dropping its output sender
/// 3. all workers are joined; the output queue is now closed
/// 4. the sink drains what is left and finishes
/// 5. counters are read
///
/// Sink order follows worker completion, not input order.
pub struct Pipeline<P: ErrorPolicy> {
    processor: Arc<DealProcessor>,
    error_policy: P,
    config: PipelineConfig,
}

impl<P: ErrorPolicy> Pipeline<P> {
    pub fn new(processor: DealProcessor, error_policy: P) -> Self {
        Self {
            processor: Arc::new(processor),
            error_policy,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run<S, K>(&self, source: S, sink: K) -> Result<RunOutcome<K::Output>, PipelineError>
    where
        S: Stream<Item = Result<RawRecord, SourceError>> + Unpin,
        K: DealSink + 'static,
        K::Output: 'static,
    {
        let counters = Arc::new(RunCounters::new());
        let (output_tx, output_rx) = mpsc::channel(self.config.output_capacity());

        let mut lanes = Vec::with_capacity(self.config.workers);
        let mut workers = Vec::with_capacity(self.config.workers);
        for worker_id in 0..self.config.workers {
            let (lane_tx, lane_rx) = mpsc::channel(self.config.queue_depth);
            lanes.push(lane_tx);
            workers.push(tokio::spawn(run_worker(
                worker_id,
                lane_rx,
                output_tx.clone(),
                Arc::clone(&self.processor),
                Arc::clone(&counters),
                self.error_policy.clone(),
            )));
        }
        // Workers now hold the only output senders
        drop(output_tx);

        let sink_task = tokio::spawn(drain_into(output_rx, sink));

        debug!(workers = self.config.workers, "Pipeline started");
        let produced = produce(source, lanes, &counters, &self.error_policy).await;

        let mut worker_failure: Option<JoinError> = None;
        for handle in workers {
            if let Err(e) = handle.await {
                worker_failure.get_or_insert(e);
            }
        }

        let sunk = sink_task.await;
        let stats = counters.snapshot();
        debug!(?stats, "Pipeline finished");

        produced?;
        let output = sunk??;
        if let Some(e) = worker_failure {
            return Err(e.into());
        }

        Ok(RunOutcome { output, stats })
    }
}

/// Dispatch records round-robin; returns early if every path to the sink
/// is gone
async fn produce<S, P>(
    mut source: S,
    lanes: Vec<mpsc::Sender<RawRecord>>,
    counters: &RunCounters,
    policy: &P,
) -> Result<(), SourceError>
where
    S: Stream<Item = Result<RawRecord, SourceError>> + Unpin,
    P: ErrorPolicy,
{
    let mut next = 0;

    while let Some(item) = source.next().await {
        let Some(raw) = screen_source_item(item, counters, policy)? else {
            continue;
        };
        if lanes[next].send(raw).await.is_err() {
            debug!(lane = next, "Worker lane closed, producer stopping");
            break;
        }
        next = (next + 1) % lanes.len();
    }

    Ok(())
}

async fn run_worker<P: ErrorPolicy>(
    worker_id: usize,
    mut lane: mpsc::Receiver<RawRecord>,
    output: mpsc::Sender<MatchedDeal>,
    processor: Arc<DealProcessor>,
    counters: Arc<RunCounters>,
    policy: P,
) {
    debug!(worker_id, "Worker started");

    while let Some(raw) = lane.recv().await {
        if let Some(deal) = process_record(&processor, &raw, &counters, &policy)
            && output.send(deal).await.is_err()
        {
            debug!(worker_id, "Sink closed, worker stopping");
            break;
        }
    }

    debug!(worker_id, "Worker finished");
}

async fn drain_into<K: DealSink>(
    mut output: mpsc::Receiver<MatchedDeal>,
    mut sink: K,
) -> Result<K::Output, SinkError> {
    while let Some(deal) = output.recv().await {
        sink.accept(deal).await?;
    }
    sink.finish().await
}
