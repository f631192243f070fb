use std::path::PathBuf;

use reqwest::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration for the donor-finder front end.
///
/// Built once at startup and passed down explicitly; nothing below `main`
/// reads the process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: Url,
    pub env: Environment,
    pub log_level: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub list_limit: u32,
    pub semantic_limit: u32,
    pub default_state: Option<String>,
    pub ledger_path: PathBuf,
}
