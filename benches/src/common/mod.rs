/// Generate an NDJSON deal dump with the given number of records.
///
/// Every tenth record is unverified and every seventh is not yet activated,
/// so the filter rejects a realistic share of the input.
pub fn generate_ndjson_dataset(num_deals: usize, num_clients: usize, num_providers: usize) -> Vec<u8> {
    let mut out = String::with_capacity(num_deals * 420);

    for i in 0..num_deals {
        let client = format!("f0{}", 1000 + i % num_clients);
        let provider = format!("f0{}", 20000 + (i / num_clients) % num_providers);
        let verified = i % 10 != 0;
        let sector_start = if i % 7 == 0 { -1 } else { 2_000_000 + i as i64 };

        out.push_str(&format!(
            r#"{{"Proposal":{{"PieceCID":{{"/":"baga6ea4seaqpiece{i}"}},"PieceSize":34359738368,"VerifiedDeal":{verified},"Client":"{client}","Provider":"{provider}","Label":"bafy{i}","StartEpoch":{start},"EndEpoch":{end},"StoragePricePerEpoch":"0","ProviderCollateral":"0","ClientCollateral":"0"}},"State":{{"SectorStartEpoch":{sector_start},"LastUpdatedEpoch":-1,"SlashEpoch":-1}}}}"#,
            start = 1_900_000 + i,
            end = 3_400_000 + i,
        ));
        out.push('\n');
    }

    out.into_bytes()
}

/// Same deals as [`generate_ndjson_dataset`], laid out as a JSON-RPC map document
pub fn generate_map_document(num_deals: usize, num_clients: usize, num_providers: usize) -> Vec<u8> {
    let lines = generate_ndjson_dataset(num_deals, num_clients, num_providers);
    let text = String::from_utf8_lossy(&lines);

    let mut out = String::from(r#"{"jsonrpc":"2.0","id":1,"result":{"#);
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format!(r#""{}":{}"#, i, line));
    }
    out.push_str("}}");
    out.into_bytes()
}
