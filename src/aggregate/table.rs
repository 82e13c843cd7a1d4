use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::error::AggregateError;
use crate::domain::DealRecord;

/// Aggregation key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorPair {
    pub client: String,
    pub provider: String,
}

impl ActorPair {
    pub fn new(client: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            provider: provider.into(),
        }
    }
}

/// One line of a table snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub client: String,
    pub provider: String,
    pub bytes: i64,
}

/// Sum of piece sizes per (client, provider) plus a grand total.
///
/// Every addition is checked; overflow is reported instead of wrapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationTable {
    sizes: HashMap<ActorPair, i64>,
    total: i64,
}

impl AggregationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one accepted deal
    pub fn accept(&mut self, deal: &DealRecord) -> Result<(), AggregateError> {
        self.add(ActorPair::new(&deal.client, &deal.provider), deal.piece_size)
    }

    fn add(&mut self, key: ActorPair, size: i64) -> Result<(), AggregateError> {
        let total = self
            .total
            .checked_add(size)
            .ok_or(AggregateError::TotalOverflow)?;

        match self.sizes.entry(key) {
            Entry::Occupied(mut e) => {
                let sum = e.get().checked_add(size).ok_or_else(|| AggregateError::Overflow {
                    client: e.key().client.clone(),
                    provider: e.key().provider.clone(),
                })?;
                *e.get_mut() = sum;
            }
            Entry::Vacant(e) => {
                e.insert(size);
            }
        }

        self.total = total;
        Ok(())
    }

    /// Combine two tables key by key; missing keys count as zero.
    ///
    /// Commutative and associative, so partial tables may be merged in any
    /// order.
    pub fn merge(mut self, other: Self) -> Result<Self, AggregateError> {
        if self.sizes.len() < other.sizes.len() {
            return other.merge(self);
        }
        for (key, size) in other.sizes {
            self.add(key, size)?;
        }
        Ok(self)
    }

    pub fn get(&self, client: &str, provider: &str) -> Option<i64> {
        self.sizes.get(&ActorPair::new(client, provider)).copied()
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Rows ordered client-major, provider-minor.
    ///
    /// Each dimension follows the caller's list when it is non-empty and is
    /// sorted lexicographically otherwise. Combinations with no accepted deal
    /// are skipped. Only pairs present in the table are visited.
    pub fn snapshot(&self, client_order: &[String], provider_order: &[String]) -> Vec<TableRow> {
        let mut by_client: HashMap<&str, Vec<(&str, i64)>> = HashMap::new();
        for (key, &bytes) in &self.sizes {
            by_client
                .entry(key.client.as_str())
                .or_default()
                .push((key.provider.as_str(), bytes));
        }

        let clients: Vec<&str> = if client_order.is_empty() {
            let mut present: Vec<&str> = by_client.keys().copied().collect();
            present.sort_unstable();
            present
        } else {
            let mut seen = HashSet::new();
            client_order
                .iter()
                .map(String::as_str)
                .filter(|client| seen.insert(*client))
                .collect()
        };
        let provider_rank = Self::rank(provider_order);

        let mut rows = Vec::with_capacity(self.sizes.len());
        for client in clients {
            let Some(mut providers) = by_client.remove(client) else {
                continue;
            };
            match &provider_rank {
                Some(rank) => {
                    providers.retain(|(provider, _)| rank.contains_key(provider));
                    providers.sort_unstable_by_key(|(provider, _)| rank[provider]);
                }
                None => providers.sort_unstable_by_key(|(provider, _)| *provider),
            }
            rows.extend(providers.into_iter().map(|(provider, bytes)| TableRow {
                client: client.to_string(),
                provider: provider.to_string(),
                bytes,
            }));
        }
        rows
    }

    /// First position of each name in an explicit order; `None` when unordered
    fn rank(order: &[String]) -> Option<HashMap<&str, usize>> {
        if order.is_empty() {
            return None;
        }
        let mut rank = HashMap::with_capacity(order.len());
        for (position, name) in order.iter().enumerate() {
            rank.entry(name.as_str()).or_insert(position);
        }
        Some(rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TIB;

    fn deal(client: &str, provider: &str, piece_size: i64) -> DealRecord {
        DealRecord {
            client: client.to_string(),
            provider: provider.to_string(),
            piece_size,
            verified_deal: true,
            start_epoch: 0,
            sector_start_epoch: 0,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accept_accumulates_per_pair_and_total() {
        let mut table = AggregationTable::new();
        table.accept(&deal("c1", "p1", 10)).unwrap();
        table.accept(&deal("c1", "p1", 5)).unwrap();
        table.accept(&deal("c2", "p1", 7)).unwrap();

        assert_eq!(table.get("c1", "p1"), Some(15));
        assert_eq!(table.get("c2", "p1"), Some(7));
        assert_eq!(table.get("c2", "p2"), None);
        assert_eq!(table.total(), 22);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn merge_sums_overlapping_keys() {
        let mut a = AggregationTable::new();
        a.accept(&deal("c1", "p1", TIB)).unwrap();
        a.accept(&deal("c1", "p2", 3)).unwrap();

        let mut b = AggregationTable::new();
        b.accept(&deal("c1", "p1", TIB)).unwrap();
        b.accept(&deal("c9", "p9", 4)).unwrap();

        let merged = a.merge(b).unwrap();
        assert_eq!(merged.get("c1", "p1"), Some(2 * TIB));
        assert_eq!(merged.get("c1", "p2"), Some(3));
        assert_eq!(merged.get("c9", "p9"), Some(4));
        assert_eq!(merged.total(), 2 * TIB + 7);
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let mut a = AggregationTable::new();
        a.accept(&deal("c1", "p1", 42)).unwrap();

        assert_eq!(a.clone().merge(AggregationTable::new()).unwrap(), a);
        assert_eq!(AggregationTable::new().merge(a.clone()).unwrap(), a);
    }

    #[test]
    fn overflow_is_reported_and_table_unchanged() {
        let mut table = AggregationTable::new();
        table.accept(&deal("c1", "p1", i64::MAX)).unwrap();

        assert_eq!(
            table.accept(&deal("c2", "p2", 1)),
            Err(AggregateError::TotalOverflow)
        );
        assert_eq!(table.total(), i64::MAX);
        assert_eq!(table.get("c2", "p2"), None);
    }

    #[test]
    fn snapshot_defaults_to_lexicographic_order() {
        let mut table = AggregationTable::new();
        table.accept(&deal("c2", "p1", 1)).unwrap();
        table.accept(&deal("c1", "p2", 2)).unwrap();
        table.accept(&deal("c1", "p1", 3)).unwrap();

        let rows = table.snapshot(&[], &[]);
        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.client.as_str(), r.provider.as_str()))
            .collect();
        assert_eq!(keys, vec![("c1", "p1"), ("c1", "p2"), ("c2", "p1")]);
    }

    #[test]
    fn snapshot_follows_explicit_lists_and_skips_absent_pairs() {
        let mut table = AggregationTable::new();
        table.accept(&deal("c1", "p1", 1)).unwrap();
        table.accept(&deal("c2", "p2", 2)).unwrap();
        table.accept(&deal("c2", "p1", 3)).unwrap();

        let rows = table.snapshot(&names(&["c2", "c1", "c3"]), &names(&["p2", "p1"]));
        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.client.as_str(), r.provider.as_str(), r.bytes))
            .collect();
        assert_eq!(keys, vec![("c2", "p2", 2), ("c2", "p1", 3), ("c1", "p1", 1)]);
    }

    #[test]
    fn snapshot_mixes_explicit_and_sorted_dimensions() {
        let mut table = AggregationTable::new();
        table.accept(&deal("c1", "pB", 1)).unwrap();
        table.accept(&deal("c1", "pA", 2)).unwrap();

        let rows = table.snapshot(&names(&["c1", "c1"]), &[]);
        let providers: Vec<_> = rows.iter().map(|r| r.provider.as_str()).collect();
        assert_eq!(providers, vec!["pA", "pB"]);
    }

    #[test]
    fn snapshot_of_large_sparse_table() {
        let mut table = AggregationTable::new();
        for i in 0..3000 {
            table
                .accept(&deal(&format!("c{i:04}"), &format!("p{:04}", 2999 - i), i + 1))
                .unwrap();
        }

        let rows = table.snapshot(&[], &[]);
        assert_eq!(rows.len(), 3000);
        assert_eq!((rows[0].client.as_str(), rows[0].provider.as_str()), ("c0000", "p2999"));
        assert!(rows.windows(2).all(|w| w[0].client < w[1].client));
        assert_eq!(rows.iter().map(|r| r.bytes).sum::<i64>(), table.total());

        let picked = table.snapshot(&names(&["c2999", "c0001", "c0000"]), &names(&["p0000", "p2999"]));
        let keys: Vec<_> = picked
            .iter()
            .map(|r| (r.client.as_str(), r.provider.as_str(), r.bytes))
            .collect();
        assert_eq!(keys, vec![("c2999", "p0000", 3000), ("c0000", "p2999", 1)]);
    }

    #[test]
    fn snapshot_orders_providers_within_each_client() {
        let mut table = AggregationTable::new();
        table.accept(&deal("c1", "p1", 1)).unwrap();
        table.accept(&deal("c1", "p2", 2)).unwrap();
        table.accept(&deal("c1", "p3", 3)).unwrap();

        let rows = table.snapshot(&[], &names(&["p3", "p1", "p3"]));
        let providers: Vec<_> = rows.iter().map(|r| r.provider.as_str()).collect();
        assert_eq!(providers, vec!["p3", "p1"]);
    }
}
