use bytes::Bytes;
use serde::Deserialize;

use super::error::DecodeError;
use super::record::RawRecord;
use crate::domain::deal::piece_size;
use crate::domain::{DealRecord, MarketDeal};

/// How much of each record the decoder materializes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Only the filter/aggregation fields; everything else is skipped
    #[default]
    Partial,
    /// The whole deal, re-encoded after filtering for pass-through output
    Full,
}

/// A successfully decoded record
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedDeal {
    pub record: DealRecord,
    pub full: Option<MarketDeal>,
}

impl DecodedDeal {
    /// The full record as one JSON line; `None` for partial decodes, which
    /// have nothing to reproduce
    pub fn encode(&self) -> Result<Option<Bytes>, serde_json::Error> {
        self.full
            .as_ref()
            .map(|deal| serde_json::to_vec(deal).map(Bytes::from))
            .transpose()
    }
}

#[derive(Deserialize)]
struct PartialDeal {
    #[serde(rename = "Proposal")]
    proposal: PartialProposal,
    #[serde(rename = "State")]
    state: PartialState,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PartialProposal {
    client: String,
    provider: String,
    #[serde(deserialize_with = "piece_size")]
    piece_size: i64,
    #[serde(default)]
    verified_deal: bool,
    start_epoch: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PartialState {
    sector_start_epoch: i64,
}

impl From<PartialDeal> for DealRecord {
    fn from(deal: PartialDeal) -> Self {
        Self {
            client: deal.proposal.client,
            provider: deal.proposal.provider,
            piece_size: deal.proposal.piece_size,
            verified_deal: deal.proposal.verified_deal,
            start_epoch: deal.proposal.start_epoch,
            sector_start_epoch: deal.state.sector_start_epoch,
        }
    }
}

/// Decodes raw records in the configured [`DecodeMode`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordDecoder {
    mode: DecodeMode,
}

impl RecordDecoder {
    pub fn new(mode: DecodeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    pub fn decode(&self, raw: &RawRecord) -> Result<DecodedDeal, DecodeError> {
        let invalid = |source| DecodeError {
            origin: raw.origin.to_string(),
            source,
        };

        match self.mode {
            DecodeMode::Partial => {
                let deal: PartialDeal = serde_json::from_slice(&raw.body).map_err(invalid)?;
                Ok(DecodedDeal {
                    record: deal.into(),
                    full: None,
                })
            }
            DecodeMode::Full => {
                let deal: MarketDeal = serde_json::from_slice(&raw.body).map_err(invalid)?;
                Ok(DecodedDeal {
                    record: deal.record(),
                    full: Some(deal),
                })
            }
        }
    }
}
