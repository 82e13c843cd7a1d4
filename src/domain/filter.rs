use std::collections::HashSet;

use super::deal::DealRecord;
use super::error::DomainError;

/// Inclusive range of chain epochs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochWindow {
    start: i64,
    end: i64,
}

impl EpochWindow {
    /// Create a window, rejecting `start > end`
    pub fn new(start: i64, end: i64) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvertedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window covering every epoch
    pub fn unbounded() -> Self {
        Self {
            start: i64::MIN,
            end: i64::MAX,
        }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn contains(&self, epoch: i64) -> bool {
        self.start <= epoch && epoch <= self.end
    }
}

impl Default for EpochWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Immutable eligibility rules for one run.
///
/// A deal is accepted when it is verified and activated (or pending mode is
/// on), its actors pass the allow-lists, and its `StartEpoch` falls inside the
/// window (skipped in pending mode). An empty allow-list is a wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    clients: HashSet<String>,
    providers: HashSet<String>,
    window: EpochWindow,
    pending: bool,
}

impl FilterCriteria {
    /// Criteria accepting every verified, activated deal
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clients<I, S>(mut self, clients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clients = clients.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers = providers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_window(mut self, window: EpochWindow) -> Self {
        self.window = window;
        self
    }

    /// Count verified deals regardless of activation and window
    pub fn with_pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    pub fn window(&self) -> EpochWindow {
        self.window
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Full predicate: all three stages must pass
    pub fn accepts(&self, deal: &DealRecord) -> bool {
        self.is_eligible(deal) && self.matches_actors(deal) && self.in_window(deal)
    }

    /// Stage 1: verified, and activated unless pending mode is on
    pub fn is_eligible(&self, deal: &DealRecord) -> bool {
        deal.verified_deal && (self.pending || deal.is_activated())
    }

    /// Stage 2: allow-list membership, empty lists acting as wildcards
    pub fn matches_actors(&self, deal: &DealRecord) -> bool {
        let client_ok = self.clients.is_empty() || self.clients.contains(&deal.client);
        let provider_ok = self.providers.is_empty() || self.providers.contains(&deal.provider);
        client_ok && provider_ok
    }

    /// Stage 3: proposal start epoch within the window
    pub fn in_window(&self, deal: &DealRecord) -> bool {
        self.pending || self.window.contains(deal.start_epoch)
    }
}
