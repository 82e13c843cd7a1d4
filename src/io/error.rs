use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning an input byte stream into raw records
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Read error: {0}")]
    Read(#[from] io::Error),

    #[error("Record exceeds maximum size of {limit} bytes")]
    RecordTooLarge { limit: usize },

    #[error("Malformed deal document: {0}")]
    Document(#[source] serde_json::Error),

    #[error("Unreadable line {line}: not valid UTF-8")]
    UnreadableLine { line: u64 },
}

impl SourceError {
    /// Fatal errors end the run; the rest skip one record
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnreadableLine { .. })
    }
}

/// A single record that could not be decoded; never fatal
#[derive(Error, Debug)]
#[error("Invalid record {origin}: {source}")]
pub struct DecodeError {
    pub origin: String,
    #[source]
    pub source: serde_json::Error,
}

/// Errors writing the final report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
