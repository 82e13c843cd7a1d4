use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::error::SinkError;
use crate::aggregate::AggregationTable;
use crate::engine::MatchedDeal;

/// Final stage of a run: consumes matched deals in arrival order
#[async_trait]
pub trait DealSink: Send + Sized {
    type Output: Send;

    async fn accept(&mut self, deal: MatchedDeal) -> Result<(), SinkError>;

    /// Called once after the last deal
    async fn finish(self) -> Result<Self::Output, SinkError>;
}

/// Aggregates matched deals into one table
#[derive(Debug, Default)]
pub struct TableSink {
    table: AggregationTable,
}

impl TableSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DealSink for TableSink {
    type Output = AggregationTable;

    async fn accept(&mut self, deal: MatchedDeal) -> Result<(), SinkError> {
        self.table.accept(&deal.record)?;
        Ok(())
    }

    async fn finish(self) -> Result<AggregationTable, SinkError> {
        Ok(self.table)
    }
}

/// Writes each matched deal as one JSON line.
///
/// Uses the worker's re-encoded record when present. Deals decoded in
/// partial mode carry none and are written as the flat `DealRecord`
/// projection instead. Output is the number of lines written.
pub struct NdjsonSink<W> {
    writer: W,
    written: u64,
}

impl<W> NdjsonSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }
}

#[async_trait]
impl<W> DealSink for NdjsonSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    type Output = u64;

    async fn accept(&mut self, deal: MatchedDeal) -> Result<(), SinkError> {
        match deal.encoded {
            Some(line) => self.writer.write_all(&line).await?,
            None => {
                let line = serde_json::to_vec(&deal.record)?;
                self.writer.write_all(&line).await?;
            }
        }
        self.writer.write_all(b"\n").await?;
        self.written += 1;
        Ok(())
    }

    async fn finish(mut self) -> Result<u64, SinkError> {
        self.writer.flush().await?;
        Ok(self.written)
    }
}
