use std::path::{Path, PathBuf};

use super::args::{Args, FormatArg, FramingArg, ModeArg};
use super::error::AppError;
use crate::domain::{ChainClock, EpochWindow, FilterCriteria};
use crate::io::{DecodeMode, Framing, ReportFormat};
use crate::streaming::PipelineConfig;

/// What a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Aggregation report in the given layout
    Aggregate(ReportFormat),
    /// Matching deals re-emitted as NDJSON
    Emit,
}

/// Which runner drives the stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    Sequential,
    Concurrent(PipelineConfig),
}

/// Validated, immutable configuration for one invocation
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub inputs: Vec<PathBuf>,
    /// `None` picks a framing per input
    pub framing: Option<Framing>,
    pub max_record_bytes: usize,
    pub criteria: FilterCriteria,
    /// Row order for the report; empty means lexicographic
    pub client_order: Vec<String>,
    pub provider_order: Vec<String>,
    pub mode: RunMode,
    pub execution: Execution,
}

impl RunConfig {
    pub fn from_args(args: Args) -> Result<Self, AppError> {
        if args.max_record_bytes == 0 {
            return Err(AppError::InvalidArguments(
                "--max-record-bytes must be greater than zero".to_string(),
            ));
        }
        if args.workers == Some(0) {
            return Err(AppError::InvalidArguments(
                "--workers must be greater than zero".to_string(),
            ));
        }

        let window = resolve_window(&args)?;
        let clients = actor_list(&args.clients);
        let providers = actor_list(&args.providers);

        let criteria = FilterCriteria::new()
            .with_clients(clients.iter().cloned())
            .with_providers(providers.iter().cloned())
            .with_window(window)
            .with_pending(args.pending);

        let framing = match args.framing {
            FramingArg::Auto => None,
            FramingArg::Ndjson => Some(Framing::Ndjson),
            FramingArg::Map => Some(Framing::MapDocument),
        };

        let mode = match args.mode {
            ModeArg::Emit => RunMode::Emit,
            ModeArg::Aggregate => RunMode::Aggregate(match args.format {
                FormatArg::Table => ReportFormat::Table,
                FormatArg::Csv => ReportFormat::Csv,
                FormatArg::Json => ReportFormat::Json,
            }),
        };

        let execution = if args.sequential {
            Execution::Sequential
        } else {
            let config = PipelineConfig::default();
            Execution::Concurrent(match args.workers {
                Some(workers) => config.with_workers(workers),
                None => config,
            })
        };

        Ok(Self {
            inputs: args.inputs,
            framing,
            max_record_bytes: args.max_record_bytes,
            criteria,
            client_order: clients,
            provider_order: providers,
            mode,
            execution,
        })
    }

    pub fn framing_for(&self, path: &Path) -> Framing {
        self.framing.unwrap_or_else(|| Framing::detect(path))
    }

    /// Emitting needs the whole record; aggregating only the filter fields
    pub fn decode_mode(&self) -> DecodeMode {
        match self.mode {
            RunMode::Emit => DecodeMode::Full,
            RunMode::Aggregate(_) => DecodeMode::Partial,
        }
    }

    /// Window to print with the report; none in pending mode
    pub fn report_window(&self) -> Option<EpochWindow> {
        (!self.criteria.is_pending()).then(|| self.criteria.window())
    }
}

/// Trim entries and drop empty ones; duplicates keep their first position
fn actor_list(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for entry in raw.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !out.iter().any(|seen| seen == entry) {
            out.push(entry.to_string());
        }
    }
    out
}

/// Explicit epochs win over timestamps, per bound. Pending mode ignores the
/// window, so an inverted one is not an error there.
fn resolve_window(args: &Args) -> Result<EpochWindow, AppError> {
    let clock = ChainClock::mainnet(args.utc_offset_hours)?;

    let start = match args.start_epoch {
        Some(epoch) => epoch,
        None => clock.epoch_at(&args.start)?,
    };
    let end = match args.end_epoch {
        Some(epoch) => epoch,
        None => clock.epoch_at(&args.end)?,
    };

    match EpochWindow::new(start, end) {
        Err(_) if args.pending => Ok(EpochWindow::unbounded()),
        window => Ok(window?),
    }
}
