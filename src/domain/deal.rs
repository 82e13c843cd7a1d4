use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

/// `SectorStartEpoch` value of a deal that has not been activated on chain
pub const INACTIVE_SECTOR_EPOCH: i64 = -1;

/// The fields of one deal needed to filter and aggregate it.
///
/// Built either by the partial decoder (which skips every other field) or
/// from a fully decoded [`MarketDeal`]. Lives only as long as the record is
/// in flight. `piece_size` is never negative once decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DealRecord {
    pub client: String,
    pub provider: String,
    pub piece_size: i64,
    pub verified_deal: bool,
    pub start_epoch: i64,
    pub sector_start_epoch: i64,
}

impl DealRecord {
    /// True once the deal has been sealed into a sector
    pub fn is_activated(&self) -> bool {
        self.sector_start_epoch != INACTIVE_SECTOR_EPOCH
    }
}

/// `PieceSize` must fit the signed accumulator: `0..=i64::MAX`
pub(crate) fn piece_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let size = i64::deserialize(deserializer)?;
    if size < 0 {
        return Err(de::Error::invalid_value(
            de::Unexpected::Signed(size),
            &"a non-negative piece size",
        ));
    }
    Ok(size)
}

/// Complete market deal as published in state dumps, used for pass-through
/// re-emission where the whole record must be reproduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MarketDeal {
    #[serde(rename = "DealID", default, skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<i64>,
    pub proposal: DealProposal,
    pub state: DealState,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deal terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DealProposal {
    #[serde(rename = "PieceCID", default)]
    pub piece_cid: Value,
    #[serde(deserialize_with = "piece_size")]
    pub piece_size: i64,
    #[serde(default)]
    pub verified_deal: bool,
    pub client: String,
    pub provider: String,
    #[serde(default)]
    pub label: Value,
    pub start_epoch: i64,
    #[serde(default)]
    pub end_epoch: i64,
    #[serde(default)]
    pub storage_price_per_epoch: String,
    #[serde(default)]
    pub provider_collateral: String,
    #[serde(default)]
    pub client_collateral: String,
    /// Fields this crate does not interpret, kept for re-emission
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deal lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DealState {
    #[serde(default)]
    pub sector_number: i64,
    pub sector_start_epoch: i64,
    #[serde(default)]
    pub last_updated_epoch: i64,
    #[serde(default)]
    pub slash_epoch: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarketDeal {
    /// Project the filter/aggregation fields out of the full record
    pub fn record(&self) -> DealRecord {
        DealRecord {
            client: self.proposal.client.clone(),
            provider: self.proposal.provider.clone(),
            piece_size: self.proposal.piece_size,
            verified_deal: self.proposal.verified_deal,
            start_epoch: self.proposal.start_epoch,
            sector_start_epoch: self.state.sector_start_epoch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DEAL: &str = r#"{
        "DealID": 42,
        "Proposal": {
            "PieceCID": {"/": "baga6ea4seaq"},
            "PieceSize": 34359738368,
            "VerifiedDeal": true,
            "Client": "f01234",
            "Provider": "f05678",
            "Label": "mAXCg5AIg",
            "StartEpoch": 2000000,
            "EndEpoch": 3500000,
            "StoragePricePerEpoch": "0",
            "ProviderCollateral": "8726486965467",
            "ClientCollateral": "0"
        },
        "State": {
            "SectorNumber": 17,
            "SectorStartEpoch": 1999000,
            "LastUpdatedEpoch": -1,
            "SlashEpoch": -1
        }
    }"#;

    #[test]
    fn market_deal_decodes_all_fields() {
        let deal: MarketDeal = serde_json::from_str(FULL_DEAL).unwrap();

        assert_eq!(deal.deal_id, Some(42));
        assert_eq!(deal.proposal.piece_size, 34_359_738_368);
        assert_eq!(deal.proposal.client, "f01234");
        assert_eq!(deal.proposal.provider_collateral, "8726486965467");
        assert_eq!(deal.state.sector_number, 17);
        assert_eq!(deal.state.slash_epoch, -1);
    }

    #[test]
    fn record_projects_filter_fields() {
        let deal: MarketDeal = serde_json::from_str(FULL_DEAL).unwrap();
        let record = deal.record();

        assert_eq!(
            record,
            DealRecord {
                client: "f01234".to_string(),
                provider: "f05678".to_string(),
                piece_size: 34_359_738_368,
                verified_deal: true,
                start_epoch: 2_000_000,
                sector_start_epoch: 1_999_000,
            }
        );
        assert!(record.is_activated());
    }

    #[test]
    fn reserialized_deal_keeps_wire_names() {
        let deal: MarketDeal = serde_json::from_str(FULL_DEAL).unwrap();
        let encoded = serde_json::to_value(&deal).unwrap();

        assert_eq!(encoded["DealID"], 42);
        assert_eq!(encoded["Proposal"]["PieceCID"]["/"], "baga6ea4seaq");
        assert_eq!(encoded["State"]["SectorStartEpoch"], 1_999_000);
    }

    #[test]
    fn deal_without_id_omits_it_on_output() {
        let mut deal: MarketDeal = serde_json::from_str(FULL_DEAL).unwrap();
        deal.deal_id = None;

        let encoded = serde_json::to_value(&deal).unwrap();
        assert!(encoded.get("DealID").is_none());
    }

    #[test]
    fn unknown_fields_survive_reencoding() {
        let body = r#"{
            "Proposal": {"PieceSize": 8, "Client": "f01", "Provider": "f02", "StartEpoch": 1, "Future": [1]},
            "State": {"SectorStartEpoch": 2, "VerifiedClaim": 77},
            "Extra": {"k": "v"}
        }"#;
        let deal: MarketDeal = serde_json::from_str(body).unwrap();
        assert_eq!(deal.state.extra["VerifiedClaim"], 77);

        let encoded = serde_json::to_value(&deal).unwrap();
        assert_eq!(encoded["State"]["VerifiedClaim"], 77);
        assert_eq!(encoded["Proposal"]["Future"], serde_json::json!([1]));
        assert_eq!(encoded["Extra"]["k"], "v");

        let reparsed: MarketDeal = serde_json::from_value(encoded).unwrap();
        assert_eq!(reparsed, deal);
    }

    #[test]
    fn piece_size_beyond_i64_is_rejected() {
        let body = r#"{"Proposal":{"PieceSize":9223372036854775808,"Client":"f01","Provider":"f02","StartEpoch":1},"State":{"SectorStartEpoch":2}}"#;
        assert!(serde_json::from_str::<MarketDeal>(body).is_err());

        let negative = body.replace("9223372036854775808", "-1");
        assert!(serde_json::from_str::<MarketDeal>(&negative).is_err());
    }

    #[test]
    fn sentinel_marks_inactive_deal() {
        let record = DealRecord {
            client: "f01".to_string(),
            provider: "f02".to_string(),
            piece_size: 1,
            verified_deal: true,
            start_epoch: 0,
            sector_start_epoch: INACTIVE_SECTOR_EPOCH,
        };
        assert!(!record.is_activated());
    }
}
