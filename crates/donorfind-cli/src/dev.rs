//! Local-development commands for populating a fresh backend.
//!
//! All of these are conveniences: failures are reported as warnings and the
//! command still exits successfully.

use clap::Subcommand;
use donorfind_client::seed::{
    SEED_BACKFILL_LIMIT, SEED_EMBED_BATCH_SIZE, SEED_EMBED_MAX_ROWS, SEED_INGEST_LIMIT,
    SEED_NTEE_MAJOR,
};
use donorfind_client::{seed_if_empty, ApiError, DonorApiClient, TriggerAck};
use donorfind_core::{ActionFailure, AppConfig};

use crate::render;

/// Sub-commands available under `dev`.
#[derive(Debug, Subcommand)]
pub enum DevCommands {
    /// Ingest, embed, and backfill a small dataset if the state has no donors
    Seed {
        /// State to seed (defaults to DONORFIND_DEFAULT_STATE)
        #[arg(long)]
        state: Option<String>,
    },
    /// Ingest donors from ProPublica
    Ingest {
        #[arg(long)]
        state: Option<String>,
        /// NTEE major group number
        #[arg(long, default_value_t = SEED_NTEE_MAJOR)]
        ntee_major: u32,
        #[arg(long, default_value_t = SEED_INGEST_LIMIT)]
        limit: u32,
    },
    /// Build embeddings for donors that have none
    Embeddings {
        #[arg(long, default_value_t = SEED_EMBED_BATCH_SIZE)]
        batch_size: u32,
        #[arg(long, default_value_t = SEED_EMBED_MAX_ROWS)]
        max_rows: u32,
    },
    /// Fill in missing donor websites from Apollo
    Backfill {
        #[arg(long, default_value_t = SEED_BACKFILL_LIMIT)]
        limit: u32,
    },
}

/// # Errors
///
/// Returns an error only when no state is available for `seed` or `ingest`.
pub(crate) async fn run_dev(
    client: &DonorApiClient,
    config: &AppConfig,
    command: DevCommands,
) -> anyhow::Result<()> {
    match command {
        DevCommands::Seed { state } => {
            let state = resolve_state(state.as_deref(), config)?;
            let report = seed_if_empty(client, &state).await;
            if report.seeded {
                println!("seeded donors for {state}");
            } else {
                println!("backend already has donors for {state}; nothing to seed");
            }
            crate::report_best_effort(&report.failures);
        }
        DevCommands::Ingest {
            state,
            ntee_major,
            limit,
        } => {
            let state = resolve_state(state.as_deref(), config)?;
            let result = client.ingest_propublica(&state, ntee_major, limit).await;
            print_outcome("Ingest ProPublica", result);
        }
        DevCommands::Embeddings {
            batch_size,
            max_rows,
        } => {
            let result = client.build_embeddings(batch_size, max_rows).await;
            print_outcome("Build embeddings", result);
        }
        DevCommands::Backfill { limit } => {
            let result = client.backfill_websites(limit).await;
            print_outcome("Backfill websites", result);
        }
    }
    Ok(())
}

fn resolve_state(state: Option<&str>, config: &AppConfig) -> anyhow::Result<String> {
    crate::normalize_state(state.or(config.default_state.as_deref())).ok_or_else(|| {
        anyhow::anyhow!("no state given; pass --state or set DONORFIND_DEFAULT_STATE")
    })
}

fn print_outcome(action: &str, result: Result<TriggerAck, ApiError>) {
    match result {
        Ok(ack) => println!("{}", render::render_trigger_ack(action, None, &ack)),
        Err(e) => crate::report_best_effort(&[ActionFailure::best_effort(action, &e)]),
    }
}
