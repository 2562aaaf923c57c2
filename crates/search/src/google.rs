//! Google Custom Search backend.
//!
//! Calls the Custom Search JSON API with the configured API key and search
//! engine id (`cx`). Failures come back as typed `SearchError`s — this
//! client never substitutes an empty result for an error; deciding what a
//! failure means for a pipeline run is the searcher stage's job.

use async_trait::async_trait;
use atlas_core::error::SearchError;
use atlas_core::search::{SearchBackend, SearchHit};
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";
const SEARCH_TIMEOUT_SECS: u64 = 20;

/// Google Custom Search JSON API client.
pub struct GoogleSearchClient {
    name: String,
    base_url: String,
    api_key: String,
    engine_id: String,
    client: reqwest::Client,
}

impl GoogleSearchClient {
    /// Create a new client with the given credentials.
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(SEARCH_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "google_cse".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            client,
        }
    }

    /// Create with a custom base URL (e.g., for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The API accepts 1–10 results per request.
    fn clamp_num(num_results: u32) -> u32 {
        num_results.clamp(1, 10)
    }
}

#[async_trait]
impl SearchBackend for GoogleSearchClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(
        &self,
        query: &str,
        num_results: u32,
    ) -> std::result::Result<Vec<SearchHit>, SearchError> {
        let url = format!("{}/customsearch/v1", self.base_url);
        let num = Self::clamp_num(num_results);

        debug!(backend = "google_cse", %query, num, "Sending search request");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", &num.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout(e.to_string())
                } else {
                    SearchError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(SearchError::QuotaExceeded);
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Custom Search API error");
            return Err(SearchError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: CustomSearchResponse = response.json().await.map_err(|e| {
            SearchError::InvalidResponse(format!("Failed to parse search response: {e}"))
        })?;

        // A well-formed response with no `items` means zero results, not an error.
        let hits = api_resp
            .items
            .into_iter()
            .map(|item| SearchHit {
                title: item.title.unwrap_or_default(),
                link: item.link.unwrap_or_default(),
                snippet: item.snippet.unwrap_or_default(),
            })
            .collect();

        Ok(hits)
    }
}

// --- Custom Search API types ---

#[derive(Debug, Deserialize)]
struct CustomSearchResponse {
    #[serde(default)]
    items: Vec<CustomSearchItem>,
}

#[derive(Debug, Deserialize)]
struct CustomSearchItem {
    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    link: Option<String>,

    #[serde(default)]
    snippet: Option<String>,
}
