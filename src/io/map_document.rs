use std::fmt;
use std::io::BufReader;

use bytes::Bytes;
use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::value::RawValue;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio_util::io::SyncIoBridge;
use tracing::debug;

use super::error::SourceError;
use super::record::{RawRecord, RecordOrigin};
use super::source::RecordStream;

/// Records buffered between the blocking walker and the async consumer
const WALKER_BUFFER: usize = 256;

type RecordSender = mpsc::Sender<Result<RawRecord, SourceError>>;

/// Stream the entries of the `result` object of a JSON-RPC deal dump.
///
/// The document is tokenized incrementally on a blocking thread; only one
/// record value is held in memory at a time. Any syntax error in the
/// document is fatal and ends the stream.
pub fn map_document_records<R>(reader: R) -> RecordStream
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let (tx, rx) = mpsc::channel(WALKER_BUFFER);
    let bridge = SyncIoBridge::new(reader);

    tokio::task::spawn_blocking(move || walk_document(BufReader::new(bridge), &tx));

    Box::pin(futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    }))
}

fn walk_document<R: std::io::Read>(reader: R, tx: &RecordSender) {
    let mut de = serde_json::Deserializer::from_reader(reader);
    let result = DocumentSeed { tx }
        .deserialize(&mut de)
        .and_then(|records| de.end().map(|()| records));

    match result {
        Ok(records) => debug!(records, "Map document exhausted"),
        // The consumer is gone; nobody is left to report to
        Err(_) if tx.is_closed() => debug!("Map document walk abandoned"),
        Err(e) => {
            let _ = tx.blocking_send(Err(SourceError::Document(e)));
        }
    }
}

/// Top level: `{"jsonrpc": ..., "id": ..., "result": {...}}`
struct DocumentSeed<'a> {
    tx: &'a RecordSender,
}

impl<'de> DeserializeSeed<'de> for DocumentSeed<'_> {
    type Value = u64;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<u64, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for DocumentSeed<'_> {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON-RPC response object with a `result` map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<u64, A::Error> {
        let mut records = None;

        while let Some(key) = map.next_key::<String>()? {
            if key == "result" {
                if records.is_some() {
                    return Err(de::Error::duplicate_field("result"));
                }
                records = Some(map.next_value_seed(ResultSeed { tx: self.tx })?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        records.ok_or_else(|| de::Error::missing_field("result"))
    }
}

/// The `result` map: opaque key -> deal record
struct ResultSeed<'a> {
    tx: &'a RecordSender,
}

impl<'de> DeserializeSeed<'de> for ResultSeed<'_> {
    type Value = u64;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<u64, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for ResultSeed<'_> {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of deal records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<u64, A::Error> {
        let mut count = 0u64;

        while let Some(key) = map.next_key::<String>()? {
            let value: Box<RawValue> = map.next_value()?;
            let body: Box<str> = value.into();
            let record = RawRecord::new(RecordOrigin::Key(key), Bytes::from(body.into_boxed_bytes()));

            if self.tx.blocking_send(Ok(record)).is_err() {
                return Err(de::Error::custom("record consumer closed"));
            }
            count += 1;
        }

        Ok(count)
    }
}
