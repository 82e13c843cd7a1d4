use tokio::io::AsyncWrite;
use tracing::info;

use super::config::{Execution, RunConfig, RunMode};
use super::error::AppError;
use crate::aggregate::AggregationReport;
use crate::engine::{DealProcessor, RunStats};
use crate::io::{RecordDecoder, RecordSource, RecordStream, ReportFormat, write_report};
use crate::streaming::{
    DealSink, LogErrors, NdjsonSink, Pipeline, PipelineError, RunOutcome, SequentialRunner,
    StreamCombinator, TableSink, combine,
};

/// Run one invocation end to end and write its output to `writer`.
///
/// Every input is opened before any record is read, so a missing file fails
/// the run up front. The window and counters go to stderr except for JSON
/// reports, which carry them. Returns the final counters.
pub async fn execute<W>(config: &RunConfig, writer: W) -> Result<RunStats, AppError>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let source = open_inputs(config).await?;
    let processor = DealProcessor::new(
        RecordDecoder::new(config.decode_mode()),
        config.criteria.clone(),
    );

    info!(
        inputs = config.inputs.len(),
        mode = ?config.mode,
        execution = ?config.execution,
        "Run started"
    );

    let stats = match config.mode {
        RunMode::Aggregate(format) => {
            let outcome = drive(config.execution, processor, source, TableSink::new()).await?;
            let report = AggregationReport::build(
                &outcome.output,
                &config.client_order,
                &config.provider_order,
                outcome.stats,
            )
            .with_window(config.report_window());

            if format != ReportFormat::Json {
                eprintln!("{}", describe_window(&report));
            }
            write_report(&report, format, writer).await?;
            outcome.stats
        }
        RunMode::Emit => {
            let outcome = drive(config.execution, processor, source, NdjsonSink::new(writer)).await?;
            outcome.stats
        }
    };

    if config.mode != RunMode::Aggregate(ReportFormat::Json) {
        eprintln!("{}", describe_stats(&stats));
    }
    info!(?stats, "Run finished");
    Ok(stats)
}

/// Counters line printed to stderr after a run
pub fn describe_stats(stats: &RunStats) -> String {
    format!(
        "processed {}, matched {}, invalid {}, skipped lines {}",
        stats.processed, stats.matched, stats.invalid, stats.skipped_lines
    )
}

fn describe_window(report: &AggregationReport) -> String {
    match report.window {
        Some(window) => format!("epochs {} ~ {}", window.start_epoch, window.end_epoch),
        None => "pending deals, activation window ignored".to_string(),
    }
}

async fn open_inputs(config: &RunConfig) -> Result<RecordStream, AppError> {
    let mut streams = Vec::with_capacity(config.inputs.len());
    for path in &config.inputs {
        let source = RecordSource::new(config.framing_for(path))
            .with_max_record_bytes(config.max_record_bytes);
        info!(path = %path.display(), framing = %source.framing(), "Opening input");
        streams.push(source.open(path).await?);
    }

    let combinator = match config.execution {
        Execution::Sequential => StreamCombinator::Chain,
        Execution::Concurrent(_) => StreamCombinator::Merge,
    };
    Ok(combine(streams, combinator))
}

async fn drive<K>(
    execution: Execution,
    processor: DealProcessor,
    source: RecordStream,
    sink: K,
) -> Result<RunOutcome<K::Output>, PipelineError>
where
    K: DealSink + 'static,
    K::Output: 'static,
{
    match execution {
        Execution::Sequential => SequentialRunner::new(processor, LogErrors).run(source, sink).await,
        Execution::Concurrent(config) => {
            Pipeline::new(processor, LogErrors)
                .with_config(config)
                .run(source, sink)
                .await
        }
    }
}
