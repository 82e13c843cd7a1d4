use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures::Stream;
use pin_project_lite::pin_project;
use tokio::io::AsyncRead;
use tokio_util::codec::{Decoder, FramedRead};

use super::error::SourceError;
use super::record::{RawRecord, RecordOrigin};

/// Largest accepted NDJSON record
pub const DEFAULT_MAX_RECORD_BYTES: usize = 10 * 1024 * 1024;

/// Splits a byte stream on `\n`, keeping a growable buffer up to `max_length`.
///
/// A line longer than `max_length`, not counting its `\r\n` or `\n`, is a
/// fatal framing error. The final line is yielded even without a trailing
/// newline.
#[derive(Debug, Clone)]
pub struct NdjsonCodec {
    max_length: usize,
    // Offset already scanned for a newline, so partial reads are not rescanned
    next_index: usize,
}

impl NdjsonCodec {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
        }
    }

    fn take_line(buf: &mut BytesMut, newline_at: usize) -> Bytes {
        let mut line = buf.split_to(newline_at + 1);
        line.truncate(newline_at);
        if line.last() == Some(&b'\r') {
            line.truncate(newline_at - 1);
        }
        line.freeze()
    }

    fn check_length(&self, len: usize) -> Result<(), SourceError> {
        if len > self.max_length {
            return Err(SourceError::RecordTooLarge {
                limit: self.max_length,
            });
        }
        Ok(())
    }
}

impl Default for NdjsonCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECORD_BYTES)
    }
}

impl Decoder for NdjsonCodec {
    type Item = Bytes;
    type Error = SourceError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Bytes>, SourceError> {
        // Never look past a full record and its `\r\n`
        let read_to = buf.len().min(self.max_length.saturating_add(2));

        match buf[self.next_index..read_to].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let newline_at = self.next_index + offset;
                self.next_index = 0;
                let line = Self::take_line(buf, newline_at);
                self.check_length(line.len())?;
                Ok(Some(line))
            }
            None if buf.len() > self.max_length.saturating_add(1) => {
                Err(SourceError::RecordTooLarge {
                    limit: self.max_length,
                })
            }
            None => {
                self.next_index = read_to;
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Bytes>, SourceError> {
        match self.decode(buf)? {
            Some(line) => Ok(Some(line)),
            None if buf.is_empty() => Ok(None),
            None => {
                self.next_index = 0;
                let line = buf.split_to(buf.len());
                self.check_length(line.len())?;
                Ok(Some(line.freeze()))
            }
        }
    }
}

pin_project! {
    /// Lazy stream of NDJSON records.
    ///
    /// Blank lines are skipped silently; lines that are not UTF-8 surface as
    /// non-fatal [`SourceError::UnreadableLine`] items.
    pub struct NdjsonRecords<R> {
        #[pin]
        lines: FramedRead<R, NdjsonCodec>,
        line_no: u64,
    }
}

impl<R: AsyncRead> NdjsonRecords<R> {
    pub fn new(reader: R, max_record_bytes: usize) -> Self {
        Self {
            lines: FramedRead::new(reader, NdjsonCodec::new(max_record_bytes)),
            line_no: 0,
        }
    }
}

impl<R: AsyncRead> Stream for NdjsonRecords<R> {
    type Item = Result<RawRecord, SourceError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            let line = match futures::ready!(this.lines.as_mut().poll_next(cx)) {
                Some(Ok(line)) => line,
                Some(Err(e)) => return Poll::Ready(Some(Err(e))),
                None => return Poll::Ready(None),
            };
            *this.line_no += 1;

            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            if std::str::from_utf8(&line).is_err() {
                return Poll::Ready(Some(Err(SourceError::UnreadableLine {
                    line: *this.line_no,
                })));
            }

            let origin = RecordOrigin::Line(*this.line_no);
            return Poll::Ready(Some(Ok(RawRecord::new(origin, line))));
        }
    }
}
