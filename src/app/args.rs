use std::path::PathBuf;

use clap::{Parser, ValueEnum, ValueHint};

use crate::domain::DEFAULT_UTC_OFFSET_HOURS;
use crate::io::DEFAULT_MAX_RECORD_BYTES;

pub const DEFAULT_START: &str = "2020-08-25 06:00:00";
pub const DEFAULT_END: &str = "2060-08-25 06:00:00";

#[derive(Parser, Debug)]
#[command(
    name = "dealsum",
    version,
    about = "Sum verified deal sizes per client and storage provider from market deal dumps"
)]
pub struct Args {
    /// Client ids to include, comma separated (empty = all)
    #[arg(short = 'c', long = "client", env = "DEALSUM_CLIENT", value_delimiter = ',', help_heading = "Filter")]
    pub clients: Vec<String>,

    /// Storage provider ids to include, comma separated (empty = all)
    #[arg(
        short = 's',
        long = "provider",
        visible_alias = "sp",
        env = "DEALSUM_PROVIDER",
        value_delimiter = ',',
        help_heading = "Filter"
    )]
    pub providers: Vec<String>,

    /// Window start, `YYYY-MM-DD HH:MM:SS` in --utc-offset-hours
    #[arg(long, env = "DEALSUM_START", default_value = DEFAULT_START, help_heading = "Filter")]
    pub start: String,

    /// Window end, `YYYY-MM-DD HH:MM:SS` in --utc-offset-hours
    #[arg(long, env = "DEALSUM_END", default_value = DEFAULT_END, help_heading = "Filter")]
    pub end: String,

    /// Window start as a chain epoch (overrides --start)
    #[arg(long, env = "DEALSUM_START_EPOCH", allow_negative_numbers = true, help_heading = "Filter")]
    pub start_epoch: Option<i64>,

    /// Window end as a chain epoch (overrides --end)
    #[arg(long, env = "DEALSUM_END_EPOCH", allow_negative_numbers = true, help_heading = "Filter")]
    pub end_epoch: Option<i64>,

    /// UTC offset the --start/--end timestamps are written in
    #[arg(
        long,
        env = "DEALSUM_UTC_OFFSET_HOURS",
        default_value_t = DEFAULT_UTC_OFFSET_HOURS,
        allow_negative_numbers = true,
        help_heading = "Filter"
    )]
    pub utc_offset_hours: i32,

    /// Count verified deals not yet activated and ignore the window
    #[arg(long, env = "DEALSUM_PENDING", help_heading = "Filter")]
    pub pending: bool,

    /// Input layout
    #[arg(long, value_enum, env = "DEALSUM_FRAMING", default_value_t, help_heading = "Input")]
    pub framing: FramingArg,

    /// Largest NDJSON record accepted, in bytes
    #[arg(long, env = "DEALSUM_MAX_RECORD_BYTES", default_value_t = DEFAULT_MAX_RECORD_BYTES, help_heading = "Input")]
    pub max_record_bytes: usize,

    /// Aggregate into a report, or re-emit matching deals as NDJSON
    #[arg(long, value_enum, env = "DEALSUM_MODE", default_value_t, help_heading = "Output")]
    pub mode: ModeArg,

    /// Report layout
    #[arg(long, value_enum, env = "DEALSUM_FORMAT", default_value_t, help_heading = "Output")]
    pub format: FormatArg,

    /// Decode workers (default: available parallelism)
    #[arg(short = 'w', long, env = "DEALSUM_WORKERS", help_heading = "Execution")]
    pub workers: Option<usize>,

    /// Run on a single task, in input order
    #[arg(long, env = "DEALSUM_SEQUENTIAL", conflicts_with = "workers", help_heading = "Execution")]
    pub sequential: bool,

    /// Deal dumps to read; `-` reads standard input
    #[arg(value_name = "INPUT", value_hint = ValueHint::FilePath, default_value = "-")]
    pub inputs: Vec<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramingArg {
    /// `.ndjson`/`.jsonl` files and stdin as NDJSON, anything else as a map document
    #[default]
    Auto,
    Ndjson,
    Map,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeArg {
    #[default]
    Aggregate,
    Emit,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatArg {
    #[default]
    Table,
    Csv,
    Json,
}
