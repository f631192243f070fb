//! Request parameters for the listing and search endpoints.

use serde::Serialize;

/// Filters for `GET /donors`.
///
/// `limit` is always sent. Everything else is sent only when set; blank
/// text filters and a zero offset are omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub state: Option<String>,
    /// Keyword matched against name and mission.
    pub q: Option<String>,
    pub min_assets: Option<u64>,
    pub max_assets: Option<u64>,
    pub min_grants: Option<u64>,
    pub max_grants: Option<u64>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            state: None,
            q: None,
            min_assets: None,
            max_assets: None,
            min_grants: None,
            max_grants: None,
            limit: 25,
            offset: 0,
        }
    }
}

impl ListQuery {
    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(state) = non_blank(self.state.as_deref()) {
            pairs.push(("state", state));
        }
        if let Some(q) = non_blank(self.q.as_deref()) {
            pairs.push(("q", q));
        }
        let bounds = [
            ("min_assets", self.min_assets),
            ("max_assets", self.max_assets),
            ("min_grants", self.min_grants),
            ("max_grants", self.max_grants),
        ];
        for (key, value) in bounds {
            if let Some(v) = value {
                pairs.push((key, v.to_string()));
            }
        }
        pairs.push(("limit", self.limit.to_string()));
        if self.offset > 0 {
            pairs.push(("offset", self.offset.to_string()));
        }
        pairs
    }
}

/// Body of `POST /donors/search/semantic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemanticQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_assets: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_assets: Option<u64>,
    pub limit: u32,
}

impl SemanticQuery {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            state: None,
            min_assets: None,
            max_assets: None,
            limit: 10,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
