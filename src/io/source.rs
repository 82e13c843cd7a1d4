use std::fmt;
use std::path::Path;
use std::pin::Pin;
use std::str::FromStr;

use futures::Stream;
use tokio::fs::File;
use tokio::io::AsyncRead;

use super::error::SourceError;
use super::map_document::map_document_records;
use super::ndjson::{DEFAULT_MAX_RECORD_BYTES, NdjsonRecords};
use super::record::RawRecord;

/// Lazy, non-restartable sequence of raw records
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<RawRecord, SourceError>> + Send>>;

/// Path that reads standard input instead of a file
pub const STDIN_PATH: &str = "-";

/// How records are laid out in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// One JSON record per line
    Ndjson,
    /// One JSON-RPC object whose `result` map holds the records
    MapDocument,
}

impl Framing {
    /// Guess framing from a file name: `.ndjson`/`.jsonl` anywhere in the
    /// extension chain means NDJSON, stdin defaults to NDJSON, anything else
    /// is treated as a map document.
    pub fn detect(path: &Path) -> Self {
        if path.as_os_str() == STDIN_PATH {
            return Self::Ndjson;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if name
            .split('.')
            .skip(1)
            .any(|ext| ext == "ndjson" || ext == "jsonl")
        {
            Self::Ndjson
        } else {
            Self::MapDocument
        }
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ndjson => f.write_str("ndjson"),
            Self::MapDocument => f.write_str("map"),
        }
    }
}

impl FromStr for Framing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "map" | "json" => Ok(Self::MapDocument),
            other => Err(format!("unknown framing '{}'", other)),
        }
    }
}

/// Turns an already-decompressed byte stream into raw records
#[derive(Debug, Clone, Copy)]
pub struct RecordSource {
    framing: Framing,
    max_record_bytes: usize,
}

impl RecordSource {
    pub fn new(framing: Framing) -> Self {
        Self {
            framing,
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
        }
    }

    /// Largest NDJSON line accepted before the run aborts
    pub fn with_max_record_bytes(mut self, max: usize) -> Self {
        self.max_record_bytes = max;
        self
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Stream records from any async reader
    pub fn from_reader<R>(&self, reader: R) -> RecordStream
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        match self.framing {
            Framing::Ndjson => Box::pin(NdjsonRecords::new(reader, self.max_record_bytes)),
            Framing::MapDocument => map_document_records(reader),
        }
    }

    /// Open a file (or stdin for `-`) and stream its records
    pub async fn open(&self, path: impl AsRef<Path>) -> Result<RecordStream, SourceError> {
        let path = path.as_ref();

        if path.as_os_str() == STDIN_PATH {
            return Ok(self.from_reader(tokio::io::stdin()));
        }

        let file = File::open(path).await.map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.from_reader(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn detects_framing_from_extension() {
        assert_eq!(Framing::detect(Path::new("StateMarketDeals.ndjson")), Framing::Ndjson);
        assert_eq!(Framing::detect(Path::new("deals.ndjson.zst")), Framing::Ndjson);
        assert_eq!(Framing::detect(Path::new("/tmp/deals.JSONL")), Framing::Ndjson);
        assert_eq!(Framing::detect(Path::new("StateMarketDeals.json")), Framing::MapDocument);
        assert_eq!(Framing::detect(Path::new("deals")), Framing::MapDocument);
        assert_eq!(Framing::detect(Path::new("-")), Framing::Ndjson);
    }

    #[test]
    fn parses_framing_names() {
        assert_eq!("ndjson".parse::<Framing>(), Ok(Framing::Ndjson));
        assert_eq!(" MAP ".parse::<Framing>(), Ok(Framing::MapDocument));
        assert!("xml".parse::<Framing>().is_err());
    }

    #[tokio::test]
    async fn open_missing_file_is_fatal_open_error() {
        let path = PathBuf::from("/definitely/not/here/deals.ndjson");
        let err = match RecordSource::new(Framing::Ndjson).open(&path).await {
            Err(e) => e,
            Ok(_) => panic!("Expected open to fail"),
        };

        assert!(err.is_fatal());
        match err {
            SourceError::Open { path: p, .. } => assert_eq!(p, path),
            other => panic!("Expected Open error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn open_reads_file_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"a\":1}}").unwrap();
        writeln!(file, "{{\"a\":2}}").unwrap();

        let stream = RecordSource::new(Framing::Ndjson).open(file.path()).await.unwrap();
        let records: Vec<_> = stream.collect().await;

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.is_ok()));
    }

    #[tokio::test]
    async fn from_reader_dispatches_on_framing() {
        let doc = br#"{"result":{"k1":{},"k2":{},"k3":{}}}"#;
        let records: Vec<_> = RecordSource::new(Framing::MapDocument)
            .from_reader(&doc[..])
            .collect()
            .await;

        assert_eq!(records.len(), 3);
    }
}
