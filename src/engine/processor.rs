use bytes::Bytes;
use tracing::trace;

use crate::domain::{DealRecord, FilterCriteria};
use crate::io::{DecodeError, RawRecord, RecordDecoder};

/// A record that passed the filter, ready for a sink
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedDeal {
    pub record: DealRecord,
    /// Re-encoded JSON line, present when decoding in full mode
    pub encoded: Option<Bytes>,
}

/// Decode + filter stage for one raw record.
///
/// Stateless apart from its configuration, so one instance is shared by
/// every worker.
#[derive(Debug, Clone)]
pub struct DealProcessor {
    decoder: RecordDecoder,
    criteria: FilterCriteria,
}

impl DealProcessor {
    pub fn new(decoder: RecordDecoder, criteria: FilterCriteria) -> Self {
        Self { decoder, criteria }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// `Ok(None)` when the record decodes but is filtered out
    pub fn process(&self, raw: &RawRecord) -> Result<Option<MatchedDeal>, DecodeError> {
        let decoded = self.decoder.decode(raw)?;

        if !self.criteria.accepts(&decoded.record) {
            trace!(origin = %raw.origin, "Deal filtered out");
            return Ok(None);
        }

        let encoded = decoded.encode().map_err(|source| DecodeError {
            origin: raw.origin.to_string(),
            source,
        })?;

        Ok(Some(MatchedDeal {
            record: decoded.record,
            encoded,
        }))
    }
}
