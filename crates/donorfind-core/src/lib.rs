pub mod app_config;
pub mod config;
pub mod format;
pub mod model;
pub mod profile;
pub mod report;
mod timestamp;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use format::{format_location, format_money, format_timestamp, normalize_website};
pub use model::{
    CompanyProfile, ContactRecord, DonorDetail, DonorPage, DonorRecord, EnrichmentKind,
    EnrichmentRecord, EnrichmentSource, GrantRecord, LeadershipEntry, ProfileContacts,
    SemanticHit, SemanticPage,
};
pub use profile::{build_profile_view, EvidencePage, ProfileView, StructuredProfile};
pub use report::{ActionFailure, Severity};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
