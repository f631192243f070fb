//! A single channel for surfacing failed user actions.
//!
//! Every failure is classified once: critical failures (loading donors,
//! explicit enrich/crawl requests) abort the command, best-effort failures
//! (dev seeding, backfills, automatic enrichment) are logged and skipped.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    BestEffort,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::BestEffort => write!(f, "best-effort"),
        }
    }
}

/// A failed action, ready to show to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionFailure {
    pub action: String,
    pub severity: Severity,
    pub message: String,
}

impl ActionFailure {
    pub fn critical(action: impl Into<String>, err: &impl std::fmt::Display) -> Self {
        Self {
            action: action.into(),
            severity: Severity::Critical,
            message: err.to_string(),
        }
    }

    pub fn best_effort(action: impl Into<String>, err: &impl std::fmt::Display) -> Self {
        Self {
            action: action.into(),
            severity: Severity::BestEffort,
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.action, self.message)
    }
}

impl std::error::Error for ActionFailure {}
