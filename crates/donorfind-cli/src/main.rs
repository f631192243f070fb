mod browse;
mod dev;
mod donors;
mod render;

use clap::{Parser, Subcommand};
use donorfind_client::DonorApiClient;
use donorfind_core::ActionFailure;
use tracing_subscriber::EnvFilter;

use crate::browse::BrowseArgs;
use crate::dev::DevCommands;
use crate::donors::{ListArgs, SearchArgs};

#[derive(Debug, Parser)]
#[command(name = "donorfind")]
#[command(about = "Find and research foundation donors")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List donors with keyword and range filters
    List(ListArgs),
    /// Natural-language search over donor descriptions
    Search(SearchArgs),
    /// Show a donor's aggregated profile
    Show {
        /// Donor id
        id: i64,
        /// Print the profile view as JSON
        #[arg(long)]
        json: bool,
        /// Do not request enrichment for donors that have none yet
        #[arg(long)]
        no_auto_enrich: bool,
    },
    /// Request Apollo enrichment for a donor
    Enrich {
        /// Donor id
        id: i64,
    },
    /// Request a website crawl for a donor
    Crawl {
        /// Donor id
        id: i64,
    },
    /// Request enrichment for a batch of donors that have none
    EnrichBatch {
        /// Maximum number of donors to enrich
        #[arg(long, default_value = "10")]
        limit: u32,
    },
    /// Local-development data management
    Dev {
        #[command(subcommand)]
        command: DevCommands,
    },
    /// Interactive keyword filtering; prefix a line with `?` for semantic search
    Browse(BrowseArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = donorfind_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = DonorApiClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("failed to build API client: {e}"))?;
    tracing::debug!(api_url = %client.base_url(), env = %config.env, "client ready");

    match cli.command {
        Some(Commands::List(args)) => donors::run_list(&client, &config, &args).await?,
        None => donors::run_list(&client, &config, &ListArgs::default()).await?,
        Some(Commands::Search(args)) => donors::run_search(&client, &config, &args).await?,
        Some(Commands::Show {
            id,
            json,
            no_auto_enrich,
        }) => donors::run_show(&client, &config, id, json, !no_auto_enrich).await?,
        Some(Commands::Enrich { id }) => donors::run_enrich(&client, id).await?,
        Some(Commands::Crawl { id }) => donors::run_crawl(&client, id).await?,
        Some(Commands::EnrichBatch { limit }) => donors::run_enrich_batch(&client, limit).await?,
        Some(Commands::Dev { command }) => dev::run_dev(&client, &config, command).await?,
        Some(Commands::Browse(args)) => browse::run_browse(client, &config, &args).await?,
    }

    Ok(())
}

/// Surface best-effort failures as warnings.
///
/// Critical failures are returned as errors by the command handlers instead
/// and end the process with a non-zero exit status.
pub(crate) fn report_best_effort(failures: &[ActionFailure]) {
    for failure in failures {
        tracing::warn!(
            action = %failure.action,
            severity = %failure.severity,
            "{failure}"
        );
    }
}

/// Upper-case a state filter, treating blank input as no filter.
pub(crate) fn normalize_state(state: Option<&str>) -> Option<String> {
    state
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_uppercase)
}
