//! One-shot enrichment of donors seen without any enrichment data.

use donorfind_core::{ActionFailure, DonorDetail};

use crate::client::DonorApiClient;
use crate::error::LedgerError;
use crate::ledger::AutoEnrichLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    HasEnrichments,
    AlreadyAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoEnrichOutcome {
    Skipped(SkipReason),
    /// Enrich and crawl were both requested. Failures are best-effort.
    Triggered { failures: Vec<ActionFailure> },
}

/// Requests enrichment and a crawl for a donor that has no enrichments yet
/// and has never been auto-enriched before.
///
/// The donor is claimed in the ledger before any request is sent, so a
/// second view racing this one, in this process or another, sees it as
/// already attempted.
///
/// # Errors
///
/// Returns [`LedgerError`] only if the claim cannot be written. API failures
/// are reported in [`AutoEnrichOutcome::Triggered`].
pub async fn auto_enrich_if_needed(
    client: &DonorApiClient,
    ledger: &AutoEnrichLedger,
    detail: &DonorDetail,
) -> Result<AutoEnrichOutcome, LedgerError> {
    let donor_id = detail.donor.id;
    if !detail.enrichments.is_empty() {
        return Ok(AutoEnrichOutcome::Skipped(SkipReason::HasEnrichments));
    }
    if !ledger.claim(donor_id)? {
        tracing::debug!(donor_id, "auto-enrich already attempted; skipping");
        return Ok(AutoEnrichOutcome::Skipped(SkipReason::AlreadyAttempted));
    }

    tracing::info!(donor_id, "donor has no enrichments; requesting enrich and crawl");
    let mut failures = Vec::new();
    if let Err(e) = client.trigger_enrich(donor_id).await {
        tracing::warn!(donor_id, error = %e, "auto-enrich request failed");
        failures.push(ActionFailure::best_effort("Enrich", &e));
    }
    if let Err(e) = client.trigger_crawl(donor_id).await {
        tracing::warn!(donor_id, error = %e, "auto-crawl request failed");
        failures.push(ActionFailure::best_effort("Crawl", &e));
    }
    Ok(AutoEnrichOutcome::Triggered { failures })
}
