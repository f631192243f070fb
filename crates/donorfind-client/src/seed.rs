//! Local-development seeding of an empty backend.

use donorfind_core::ActionFailure;

use crate::client::DonorApiClient;
use crate::query::ListQuery;

/// NTEE major group used for the seed set (education).
pub const SEED_NTEE_MAJOR: u32 = 2;
pub const SEED_INGEST_LIMIT: u32 = 35;
pub const SEED_EMBED_BATCH_SIZE: u32 = 32;
pub const SEED_EMBED_MAX_ROWS: u32 = 500;
pub const SEED_BACKFILL_LIMIT: u32 = 12;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// `false` when the backend already had donors for the state.
    pub seeded: bool,
    pub failures: Vec<ActionFailure>,
}

/// Seeds a small dataset when the backend has no donors for `state`.
///
/// Runs ProPublica ingest, embedding build, then website backfill. Every
/// step is best-effort: failures are logged, collected in the report, and
/// the next step still runs. A failed emptiness check counts as empty.
pub async fn seed_if_empty(client: &DonorApiClient, state: &str) -> SeedReport {
    let first_page = ListQuery {
        state: Some(state.to_string()),
        limit: 1,
        ..ListQuery::default()
    };
    match client.list_donors(&first_page).await {
        Ok(page) if page.total > 0 => {
            tracing::debug!(state, total = page.total, "backend already seeded");
            return SeedReport::default();
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(state, error = %e, "seed emptiness check failed; assuming empty"),
    }

    tracing::info!(state, "seeding empty backend");
    let mut failures = Vec::new();

    if let Err(e) = client
        .ingest_propublica(state, SEED_NTEE_MAJOR, SEED_INGEST_LIMIT)
        .await
    {
        tracing::warn!(state, error = %e, "ProPublica ingest failed");
        failures.push(ActionFailure::best_effort("Ingest ProPublica", &e));
    }

    if let Err(e) = client
        .build_embeddings(SEED_EMBED_BATCH_SIZE, SEED_EMBED_MAX_ROWS)
        .await
    {
        tracing::warn!(error = %e, "embedding build failed");
        failures.push(ActionFailure::best_effort("Build embeddings", &e));
    }

    if let Err(e) = client.backfill_websites(SEED_BACKFILL_LIMIT).await {
        tracing::warn!(error = %e, "website backfill failed");
        failures.push(ActionFailure::best_effort("Backfill websites", &e));
    }

    SeedReport {
        seeded: true,
        failures,
    }
}
