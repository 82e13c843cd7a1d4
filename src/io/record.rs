use std::fmt;

use bytes::Bytes;

/// Where a raw record came from, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOrigin {
    /// 1-based line number in NDJSON input
    Line(u64),
    /// Key of the record in a map document
    Key(String),
}

impl fmt::Display for RecordOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => write!(f, "line {}", line),
            Self::Key(key) => write!(f, "key {}", key),
        }
    }
}

/// Undecoded bytes of exactly one deal record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub origin: RecordOrigin,
    pub body: Bytes,
}

impl RawRecord {
    pub fn new(origin: RecordOrigin, body: impl Into<Bytes>) -> Self {
        Self {
            origin,
            body: body.into(),
        }
    }
}
