//! Donor listing, search, profile, and enrichment trigger commands.
//!
//! Loading donors and explicit enrich/crawl requests are critical: a failure
//! is returned as an error and nothing else is printed. Seeding and
//! automatic enrichment are best-effort and only produce warnings.

use std::path::Path;

use clap::Args;
use donorfind_client::{
    auto_enrich_if_needed, seed_if_empty, AutoEnrichLedger, AutoEnrichOutcome, DonorApiClient,
    ListQuery, SemanticQuery,
};
use donorfind_core::{build_profile_view, ActionFailure, AppConfig, DonorDetail};

use crate::render;

#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Two-letter state filter (defaults to DONORFIND_DEFAULT_STATE)
    #[arg(long)]
    pub state: Option<String>,
    /// Do not apply the default state filter
    #[arg(long, conflicts_with = "state")]
    pub all_states: bool,
    /// Keyword matched against name and mission
    #[arg(long)]
    pub q: Option<String>,
    #[arg(long)]
    pub min_assets: Option<u64>,
    #[arg(long)]
    pub max_assets: Option<u64>,
    #[arg(long)]
    pub min_grants: Option<u64>,
    #[arg(long)]
    pub max_grants: Option<u64>,
    /// Page size (defaults to DONORFIND_LIST_LIMIT)
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long, default_value = "0")]
    pub offset: u32,
    /// Seed a small dataset first if the backend has no donors for the state
    #[arg(long)]
    pub seed: bool,
}

impl ListArgs {
    pub(crate) fn to_query(&self, default_state: Option<&str>, default_limit: u32) -> ListQuery {
        let state = if self.all_states {
            None
        } else {
            crate::normalize_state(self.state.as_deref().or(default_state))
        };
        ListQuery {
            state,
            q: self.q.clone(),
            min_assets: self.min_assets,
            max_assets: self.max_assets,
            min_grants: self.min_grants,
            max_grants: self.max_grants,
            limit: self.limit.unwrap_or(default_limit),
            offset: self.offset,
        }
    }
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// What you are looking for, in plain language
    pub query: String,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub min_assets: Option<u64>,
    #[arg(long)]
    pub max_assets: Option<u64>,
    /// Maximum matches (defaults to DONORFIND_SEMANTIC_LIMIT)
    #[arg(long)]
    pub limit: Option<u32>,
}

impl SearchArgs {
    pub(crate) fn to_query(&self, default_limit: u32) -> SemanticQuery {
        SemanticQuery {
            state: crate::normalize_state(self.state.as_deref()),
            min_assets: self.min_assets,
            max_assets: self.max_assets,
            limit: self.limit.unwrap_or(default_limit),
            ..SemanticQuery::new(self.query.trim())
        }
    }
}

/// List donors, optionally seeding an empty backend first.
///
/// # Errors
///
/// Returns an error if `--seed` is given without any state, or if the
/// listing request fails.
pub(crate) async fn run_list(
    client: &DonorApiClient,
    config: &AppConfig,
    args: &ListArgs,
) -> anyhow::Result<()> {
    let query = args.to_query(config.default_state.as_deref(), config.list_limit);

    if args.seed {
        let state = query.state.as_deref().ok_or_else(|| {
            anyhow::anyhow!("--seed needs a state; pass --state or set DONORFIND_DEFAULT_STATE")
        })?;
        let report = seed_if_empty(client, state).await;
        if report.seeded {
            eprintln!("seeded empty backend for {state}");
        }
        crate::report_best_effort(&report.failures);
    }

    let page = client
        .list_donors(&query)
        .await
        .map_err(|e| ActionFailure::critical("Load donors", &e))?;
    println!("{}", render::render_donor_list(&page));
    Ok(())
}

/// Run a semantic search and print ranked matches.
///
/// # Errors
///
/// Returns an error if the query is blank or the search request fails.
pub(crate) async fn run_search(
    client: &DonorApiClient,
    config: &AppConfig,
    args: &SearchArgs,
) -> anyhow::Result<()> {
    let query = args.to_query(config.semantic_limit);
    let page = client
        .semantic_search(&query)
        .await
        .map_err(|e| ActionFailure::critical("Semantic search", &e))?;
    println!("{}", render::render_semantic_results(&page));
    Ok(())
}

/// Print a donor's aggregated profile.
///
/// When `auto_enrich` is set and the donor has no enrichments, enrichment
/// and a crawl are requested once (tracked in the ledger) and the detail is
/// fetched again before rendering.
///
/// # Errors
///
/// Returns an error if the donor cannot be loaded or JSON output fails.
pub(crate) async fn run_show(
    client: &DonorApiClient,
    config: &AppConfig,
    donor_id: i64,
    json: bool,
    auto_enrich: bool,
) -> anyhow::Result<()> {
    let mut detail = client
        .donor_detail(donor_id)
        .await
        .map_err(|e| ActionFailure::critical("Load donor", &e))?;

    if auto_enrich {
        detail = detail_after_auto_enrich(client, &config.ledger_path, detail).await;
    }

    let view = build_profile_view(
        &detail.donor,
        &detail.enrichments,
        &detail.contacts,
        &detail.grants,
    );
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", render::render_profile(&view));
    }
    Ok(())
}

/// Runs auto-enrich for `detail` and returns the detail to render.
///
/// The re-fetched detail is returned only when enrichment was requested and
/// the refresh succeeded. Every other path keeps `detail` unchanged.
async fn detail_after_auto_enrich(
    client: &DonorApiClient,
    ledger_path: &Path,
    detail: DonorDetail,
) -> DonorDetail {
    let donor_id = detail.donor.id;
    let ledger = match AutoEnrichLedger::open(ledger_path) {
        Ok(ledger) => ledger,
        Err(e) => {
            crate::report_best_effort(&[ActionFailure::best_effort("Auto-enrich", &e)]);
            return detail;
        }
    };

    match auto_enrich_if_needed(client, &ledger, &detail).await {
        Ok(AutoEnrichOutcome::Skipped(reason)) => {
            tracing::debug!(donor_id, ?reason, "auto-enrich skipped");
            detail
        }
        Ok(AutoEnrichOutcome::Triggered { failures }) => {
            tracing::info!(donor_id, "requested enrichment and crawl");
            crate::report_best_effort(&failures);
            match client.donor_detail(donor_id).await {
                Ok(refreshed) => refreshed,
                Err(e) => {
                    crate::report_best_effort(&[ActionFailure::best_effort("Refresh donor", &e)]);
                    detail
                }
            }
        }
        Err(e) => {
            crate::report_best_effort(&[ActionFailure::best_effort("Auto-enrich", &e)]);
            detail
        }
    }
}

/// # Errors
///
/// Returns an error if the enrich request fails.
pub(crate) async fn run_enrich(client: &DonorApiClient, donor_id: i64) -> anyhow::Result<()> {
    let ack = client
        .trigger_enrich(donor_id)
        .await
        .map_err(|e| ActionFailure::critical("Enrich", &e))?;
    println!("{}", render::render_trigger_ack("Enrich", Some(donor_id), &ack));
    Ok(())
}

/// # Errors
///
/// Returns an error if the crawl request fails.
pub(crate) async fn run_crawl(client: &DonorApiClient, donor_id: i64) -> anyhow::Result<()> {
    let ack = client
        .trigger_crawl(donor_id)
        .await
        .map_err(|e| ActionFailure::critical("Crawl", &e))?;
    println!("{}", render::render_trigger_ack("Crawl", Some(donor_id), &ack));
    Ok(())
}

/// # Errors
///
/// Returns an error if the batch request fails.
pub(crate) async fn run_enrich_batch(client: &DonorApiClient, limit: u32) -> anyhow::Result<()> {
    let ack = client
        .enrich_batch(limit)
        .await
        .map_err(|e| ActionFailure::critical("Batch enrich", &e))?;
    println!("{}", render::render_trigger_ack("Batch enrich", None, &ack));
    Ok(())
}

#[cfg(test)]
#[path = "donors_test.rs"]
mod tests;
