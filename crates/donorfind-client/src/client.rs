//! HTTP client for the donor API.
//!
//! Wraps `reqwest` with typed request/response handling. Any non-2xx status
//! becomes [`ApiError::Status`] carrying the status code and response text.
//! Nothing is retried; callers decide how a failure is surfaced.

use std::time::Duration;

use donorfind_core::{AppConfig, DonorDetail, DonorPage, SemanticPage};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::query::{ListQuery, SemanticQuery};

/// Outcome of a fire-and-forget trigger such as enrich or crawl.
///
/// The backend's response body is unspecified; it is kept when it parses
/// as JSON and dropped otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerAck {
    pub status: u16,
    pub body: Option<serde_json::Value>,
}

/// Client for the donor API.
///
/// Use [`DonorApiClient::from_config`] in the binary or
/// [`DonorApiClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct DonorApiClient {
    client: Client,
    base_url: Url,
}

impl DonorApiClient {
    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::with_base_url(
            config.api_url.as_str(),
            config.http_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client against an arbitrary base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` is not
    /// a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so relative joins append to the base
        // path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Lists donors matching keyword and range filters.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] on a non-2xx response.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body is not `{ items, total }`.
    pub async fn list_donors(&self, query: &ListQuery) -> Result<DonorPage, ApiError> {
        let url = self.endpoint("donors", &query.to_pairs())?;
        self.send_json(self.client.get(url.clone()), &url, "list donors")
            .await
    }

    /// Fetches one donor with its grants, contacts, and enrichments.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] on a non-2xx response (404 for unknown ids).
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body does not match [`DonorDetail`].
    pub async fn donor_detail(&self, donor_id: i64) -> Result<DonorDetail, ApiError> {
        let url = self.endpoint(&format!("donors/{donor_id}"), &[])?;
        self.send_json(
            self.client.get(url.clone()),
            &url,
            &format!("donor detail (id={donor_id})"),
        )
        .await
    }

    /// Runs a natural-language similarity search over donor embeddings.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidQuery`] if the query text is blank; no request is sent.
    /// - [`ApiError::Status`] on a non-2xx response.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body is not `{ items, count }`.
    pub async fn semantic_search(&self, query: &SemanticQuery) -> Result<SemanticPage, ApiError> {
        if query.query.trim().is_empty() {
            return Err(ApiError::InvalidQuery(
                "semantic search needs a non-empty query".to_string(),
            ));
        }
        let url = self.endpoint("donors/search/semantic", &[])?;
        self.send_json(
            self.client.post(url.clone()).json(query),
            &url,
            "semantic search",
        )
        .await
    }

    /// Asks the backend to enrich a donor from the company-data provider.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] on a non-2xx response, [`ApiError::Http`] on
    /// network failure.
    pub async fn trigger_enrich(&self, donor_id: i64) -> Result<TriggerAck, ApiError> {
        self.trigger(&format!("donors/{donor_id}/enrich"), &[]).await
    }

    /// Asks the backend to crawl a donor's website for a structured profile
    /// and evidence pages.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] on a non-2xx response, [`ApiError::Http`] on
    /// network failure.
    pub async fn trigger_crawl(&self, donor_id: i64) -> Result<TriggerAck, ApiError> {
        self.trigger(&format!("donors/{donor_id}/crawl"), &[]).await
    }

    /// Enriches up to `limit` donors that have a website but no company profile.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] on a non-2xx response, [`ApiError::Http`] on
    /// network failure.
    pub async fn enrich_batch(&self, limit: u32) -> Result<TriggerAck, ApiError> {
        self.trigger("donors/enrich/batch", &[("limit", limit.to_string())])
            .await
    }

    /// Development helper: ingest a state's organizations from ProPublica.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] on a non-2xx response, [`ApiError::Http`] on
    /// network failure.
    pub async fn ingest_propublica(
        &self,
        state: &str,
        ntee_major: u32,
        limit: u32,
    ) -> Result<TriggerAck, ApiError> {
        self.trigger(
            "donors/ingest/propublica",
            &[
                ("state", state.to_uppercase()),
                ("ntee_major", ntee_major.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    /// Development helper: (re)build the embeddings used by semantic search.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] on a non-2xx response, [`ApiError::Http`] on
    /// network failure.
    pub async fn build_embeddings(
        &self,
        batch_size: u32,
        max_rows: u32,
    ) -> Result<TriggerAck, ApiError> {
        self.trigger(
            "donors/embeddings/build",
            &[
                ("batch_size", batch_size.to_string()),
                ("max_rows", max_rows.to_string()),
            ],
        )
        .await
    }

    /// Development helper: fill in missing donor websites from Apollo.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] on a non-2xx response, [`ApiError::Http`] on
    /// network failure.
    pub async fn backfill_websites(&self, limit: u32) -> Result<TriggerAck, ApiError> {
        self.trigger(
            "donors/websites/backfill_apollo",
            &[("limit", limit.to_string())],
        )
        .await
    }

    /// Resolves `path` against the base URL and appends percent-encoded
    /// query parameters.
    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: format!("cannot join '{path}': {e}"),
            })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn trigger(&self, path: &str, query: &[(&str, String)]) -> Result<TriggerAck, ApiError> {
        let url = self.endpoint(path, query)?;
        let response = self.send(self.client.request(Method::POST, url.clone()), &url).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TriggerAck {
            status,
            body: serde_json::from_str(&body).ok(),
        })
    }

    /// Sends the request and turns any non-2xx status into [`ApiError::Status`].
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!(url = %url, "sending donor API request");
        let response = request.send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "donor API request failed");
            ApiError::Http(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let reason = status.canonical_reason().unwrap_or("").to_string();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            url = %url,
            status = status.as_u16(),
            "donor API returned non-success status"
        );
        Err(ApiError::Status {
            status: status.as_u16(),
            reason,
            url: url.to_string(),
            body,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
        context: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, url).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
