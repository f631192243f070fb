//! Client for the donor API: typed endpoints, request sequencing, and the
//! auto-enrich and seeding workflows built on them.

pub mod auto_enrich;
pub mod client;
pub mod error;
pub mod ledger;
pub mod query;
pub mod seed;
pub mod sequence;

pub use auto_enrich::{auto_enrich_if_needed, AutoEnrichOutcome, SkipReason};
pub use client::{DonorApiClient, TriggerAck};
pub use error::{ApiError, LedgerError};
pub use ledger::AutoEnrichLedger;
pub use query::{ListQuery, SemanticQuery};
pub use seed::{seed_if_empty, SeedReport};
pub use sequence::{RequestSequencer, Sequenced, SequencedSearch, Ticket};
