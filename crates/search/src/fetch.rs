//! Raw URL fetcher.
//!
//! Returns up to 20,000 characters of a page body. Declared as a
//! collaborator tool; the research pipeline itself never calls it.

use atlas_core::error::SearchError;
use tracing::debug;

/// Maximum characters of body returned, to keep payloads bounded.
const MAX_FETCH_CHARS: usize = 20_000;
const FETCH_TIMEOUT_SECS: u64 = 20;

/// Fetch raw HTML/text content from a URL, truncated to 20k characters.
pub async fn fetch_url(url: &str) -> Result<String, SearchError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(SearchError::InvalidResponse(
            "URL must start with http:// or https://".into(),
        ));
    }

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(|e| SearchError::Network(e.to_string()))?;

    debug!(%url, "Fetching URL");

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            SearchError::Timeout(e.to_string())
        } else {
            SearchError::Network(e.to_string())
        }
    })?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(SearchError::ApiError {
            status_code: status,
            message: format!("Fetch failed for {url}"),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

    Ok(truncate_chars(&body, MAX_FETCH_CHARS))
}

/// Truncate to at most `max` characters, respecting UTF-8 boundaries.
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
