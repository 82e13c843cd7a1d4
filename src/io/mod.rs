pub mod decode;
pub mod error;
pub mod map_document;
pub mod ndjson;
pub mod record;
pub mod report_writer;
pub mod source;

// Re-export commonly used types
pub use decode::{DecodeMode, DecodedDeal, RecordDecoder};
pub use error::{DecodeError, ReportError, SourceError};
pub use map_document::map_document_records;
pub use ndjson::{DEFAULT_MAX_RECORD_BYTES, NdjsonCodec, NdjsonRecords};
pub use record::{RawRecord, RecordOrigin};
pub use report_writer::{ReportFormat, write_report};
pub use source::{Framing, RecordSource, RecordStream, STDIN_PATH};
