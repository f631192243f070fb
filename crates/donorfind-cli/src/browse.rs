//! Interactive browsing: every stdin line is a new filter.
//!
//! Lines are issued as soon as they are read, without waiting for earlier
//! requests to finish. Responses go through a [`SequencedSearch`], so only
//! the answer to the most recent line is printed even when an older request
//! finishes later.

use std::sync::Arc;

use clap::Args;
use donorfind_client::{
    ApiError, DonorApiClient, ListQuery, SemanticQuery, Sequenced, SequencedSearch,
};
use donorfind_core::{ActionFailure, AppConfig};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;

#[derive(Debug, Default, Args)]
pub struct BrowseArgs {
    /// Two-letter state filter applied to every line
    #[arg(long)]
    pub state: Option<String>,
    /// Results per line (defaults to DONORFIND_LIST_LIMIT)
    #[arg(long)]
    pub limit: Option<u32>,
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BrowseQuery {
    /// Keyword filter; empty lists everything.
    Keyword(String),
    /// Line prefixed with `?`.
    Semantic(String),
}

pub(crate) fn parse_browse_line(line: &str) -> BrowseQuery {
    let line = line.trim();
    match line.strip_prefix('?') {
        Some(rest) => BrowseQuery::Semantic(rest.trim().to_string()),
        None => BrowseQuery::Keyword(line.to_string()),
    }
}

/// # Errors
///
/// Returns an error if stdin cannot be read. Request failures for the
/// latest line are printed and browsing continues.
pub(crate) async fn run_browse(
    client: DonorApiClient,
    config: &AppConfig,
    args: &BrowseArgs,
) -> anyhow::Result<()> {
    let search = SequencedSearch::new(Arc::new(client));
    let state = crate::normalize_state(args.state.as_deref().or(config.default_state.as_deref()));
    let list_limit = args.limit.unwrap_or(config.list_limit);
    let semantic_limit = args.limit.unwrap_or(config.semantic_limit);

    eprintln!(
        "type a keyword to filter donors{}, `?question` for semantic search, Ctrl-D to quit",
        state.as_deref().map(|s| format!(" in {s}")).unwrap_or_default()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = FuturesUnordered::new();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        let request = match parse_browse_line(&line) {
                            BrowseQuery::Keyword(q) => BrowseRequest::List(ListQuery {
                                state: state.clone(),
                                q: Some(q),
                                limit: list_limit,
                                ..ListQuery::default()
                            }),
                            BrowseQuery::Semantic(q) => BrowseRequest::Semantic(SemanticQuery {
                                state: state.clone(),
                                limit: semantic_limit,
                                ..SemanticQuery::new(q)
                            }),
                        };
                        in_flight.push(execute(search.clone(), request));
                    }
                    None => stdin_open = false,
                }
            }
            Some(outcome) = in_flight.next() => print_outcome(outcome),
            else => break,
        }
    }

    Ok(())
}

enum BrowseRequest {
    List(ListQuery),
    Semantic(SemanticQuery),
}

struct BrowseOutcome {
    action: &'static str,
    result: Result<Sequenced<String>, ApiError>,
}

async fn execute(search: SequencedSearch, request: BrowseRequest) -> BrowseOutcome {
    match request {
        BrowseRequest::List(query) => BrowseOutcome {
            action: "Load donors",
            result: search.list(&query).await.map(|page| match page {
                Sequenced::Fresh(page) => Sequenced::Fresh(render::render_donor_list(&page)),
                Sequenced::Stale => Sequenced::Stale,
            }),
        },
        BrowseRequest::Semantic(query) => BrowseOutcome {
            action: "Semantic search",
            result: search.semantic(&query).await.map(|page| match page {
                Sequenced::Fresh(page) => Sequenced::Fresh(render::render_semantic_results(&page)),
                Sequenced::Stale => Sequenced::Stale,
            }),
        },
    }
}

fn print_outcome(outcome: BrowseOutcome) {
    match outcome.result {
        Ok(Sequenced::Fresh(text)) => println!("{text}\n"),
        Ok(Sequenced::Stale) => {}
        // Critical for this line, but browsing continues.
        Err(e) => eprintln!("error: {}", ActionFailure::critical(outcome.action, &e)),
    }
}
