//! Latest-request-wins sequencing for overlapping searches.
//!
//! When filters change faster than the API answers, older responses can
//! arrive after newer ones. Every request takes a [`Ticket`] from a shared
//! [`RequestSequencer`]; once its response arrives it is kept only if no
//! newer ticket has been issued in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use donorfind_core::{DonorPage, SemanticPage};

use crate::client::DonorApiClient;
use crate::error::ApiError;
use crate::query::{ListQuery, SemanticQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Hands out monotonically increasing tickets. Clones share one counter.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: Arc<AtomicU64>,
}

impl RequestSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket newer than every ticket issued before it.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// `true` iff `ticket` is the most recently issued one.
    #[must_use]
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// A response gated by its ticket.
#[derive(Debug, Clone, PartialEq)]
pub enum Sequenced<T> {
    Fresh(T),
    /// A newer request was issued while this one was in flight.
    Stale,
}

impl<T> Sequenced<T> {
    pub fn into_fresh(self) -> Option<T> {
        match self {
            Sequenced::Fresh(value) => Some(value),
            Sequenced::Stale => None,
        }
    }
}

/// Listing and semantic search that discard superseded responses.
///
/// Errors from superseded requests are discarded as well: once the user has
/// moved on, a failure of the old request is no longer relevant.
#[derive(Debug, Clone)]
pub struct SequencedSearch {
    client: Arc<DonorApiClient>,
    sequencer: RequestSequencer,
}

impl SequencedSearch {
    #[must_use]
    pub fn new(client: Arc<DonorApiClient>) -> Self {
        Self {
            client,
            sequencer: RequestSequencer::new(),
        }
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from [`DonorApiClient::list_donors`] when the
    /// request is still the latest one.
    pub async fn list(&self, query: &ListQuery) -> Result<Sequenced<DonorPage>, ApiError> {
        let ticket = self.sequencer.issue();
        let result = self.client.list_donors(query).await;
        self.gate(ticket, result)
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from [`DonorApiClient::semantic_search`] when
    /// the request is still the latest one.
    pub async fn semantic(
        &self,
        query: &SemanticQuery,
    ) -> Result<Sequenced<SemanticPage>, ApiError> {
        let ticket = self.sequencer.issue();
        let result = self.client.semantic_search(query).await;
        self.gate(ticket, result)
    }

    fn gate<T>(&self, ticket: Ticket, result: Result<T, ApiError>) -> Result<Sequenced<T>, ApiError> {
        if !self.sequencer.is_latest(ticket) {
            tracing::debug!(
                ticket = ticket.value(),
                failed = result.is_err(),
                "discarding superseded response"
            );
            return Ok(Sequenced::Stale);
        }
        result.map(Sequenced::Fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_increase_monotonically() {
        let seq = RequestSequencer::new();
        let a = seq.issue();
        let b = seq.issue();
        let c = seq.issue();
        assert!(a < b && b < c);
    }

    #[test]
    fn only_newest_ticket_is_latest() {
        let seq = RequestSequencer::new();
        let first = seq.issue();
        assert!(seq.is_latest(first));
        let second = seq.issue();
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
    }

    #[test]
    fn clones_share_the_counter() {
        let seq = RequestSequencer::new();
        let other = seq.clone();
        let mine = seq.issue();
        let theirs = other.issue();
        assert!(!seq.is_latest(mine));
        assert!(seq.is_latest(theirs));
    }

    #[tokio::test]
    async fn concurrent_issuers_get_distinct_tickets() {
        let seq = RequestSequencer::new();
        let mut handles = Vec::new();
        for _ in 0..16 {
            let seq = seq.clone();
            handles.push(tokio::spawn(async move { seq.issue() }));
        }
        let mut tickets = Vec::new();
        for handle in handles {
            tickets.push(handle.await.unwrap());
        }
        tickets.sort();
        tickets.dedup();
        assert_eq!(tickets.len(), 16);
        assert!(seq.is_latest(*tickets.last().unwrap()));
    }

    #[test]
    fn into_fresh_unwraps_only_fresh() {
        assert_eq!(Sequenced::Fresh(3).into_fresh(), Some(3));
        assert_eq!(Sequenced::<u8>::Stale.into_fresh(), None);
    }
}
