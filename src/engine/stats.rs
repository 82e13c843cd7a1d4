use std::ops::Add;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Run-level counters shared by every stage of one run.
///
/// Stages only ever increment; values are read through [`RunCounters::snapshot`]
/// once all stages have stopped.
#[derive(Debug, Default)]
pub struct RunCounters {
    processed: AtomicU64,
    matched: AtomicU64,
    invalid: AtomicU64,
    skipped_lines: AtomicU64,
}

impl RunCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_matched(&self) {
        self.matched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid(&self) {
        self.invalid.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped_line(&self) {
        self.skipped_lines.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RunStats {
        RunStats {
            processed: self.processed.load(Ordering::Acquire),
            matched: self.matched.load(Ordering::Acquire),
            invalid: self.invalid.load(Ordering::Acquire),
            skipped_lines: self.skipped_lines.load(Ordering::Acquire),
        }
    }
}

/// Plain copy of the counters at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Records handed to the decoder
    pub processed: u64,
    /// Records accepted by the filter
    pub matched: u64,
    /// Records that failed to decode
    pub invalid: u64,
    /// NDJSON lines dropped before decoding
    pub skipped_lines: u64,
}

impl Add for RunStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            processed: self.processed + other.processed,
            matched: self.matched + other.matched,
            invalid: self.invalid + other.invalid,
            skipped_lines: self.skipped_lines + other.skipped_lines,
        }
    }
}
