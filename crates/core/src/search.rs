//! Search domain types and the SearchBackend trait.
//!
//! A search backend turns a keyword query into ranked hits. Backends return
//! typed errors; deciding what a failure means for the run (here: a
//! synthetic error hit per sub-question) is the searcher stage's job, not
//! the backend's.

use crate::error::SearchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single search result. Any field may be an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

impl SearchHit {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            snippet: snippet.into(),
        }
    }

    /// The converged failure representation: a single hit standing in for a
    /// failed search call, carrying the reason in the snippet.
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            title: "Error".into(),
            link: String::new(),
            snippet: reason.into(),
        }
    }

    /// True for hits produced by [`SearchHit::error`].
    pub fn is_error(&self) -> bool {
        self.title == "Error" && self.link.is_empty()
    }
}

/// The association of one sub-question with its ordered hits.
///
/// `hits` may be empty (search disabled or genuinely no results), but a
/// block is always present for every sub-question attempted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultBlock {
    pub subquestion: String,
    pub hits: Vec<SearchHit>,
}

impl ResultBlock {
    pub fn new(subquestion: impl Into<String>, hits: Vec<SearchHit>) -> Self {
        Self {
            subquestion: subquestion.into(),
            hits,
        }
    }

    /// A block recording that the sub-question was attempted but produced
    /// nothing (e.g. search disabled).
    pub fn empty(subquestion: impl Into<String>) -> Self {
        Self::new(subquestion, Vec::new())
    }
}

/// The core SearchBackend trait.
///
/// Implementations clamp `num_results` to their API's bounds (Google Custom
/// Search: 1–10) and must return an error rather than silently substituting
/// an empty result.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// A human-readable name for this backend (e.g., "google_cse").
    fn name(&self) -> &str;

    /// Run a keyword search, returning up to `num_results` hits.
    async fn search(
        &self,
        query: &str,
        num_results: u32,
    ) -> std::result::Result<Vec<SearchHit>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_hit_shape() {
        let hit = SearchHit::error("connection refused");
        assert_eq!(hit.title, "Error");
        assert!(hit.link.is_empty());
        assert_eq!(hit.snippet, "connection refused");
        assert!(hit.is_error());
    }

    #[test]
    fn ordinary_hit_is_not_error() {
        let hit = SearchHit::new("Error handling in Rust", "https://doc.rust-lang.org", "...");
        assert!(!hit.is_error());
    }

    #[test]
    fn empty_block_keeps_subquestion() {
        let block = ResultBlock::empty("What is the speed of light?");
        assert_eq!(block.subquestion, "What is the speed of light?");
        assert!(block.hits.is_empty());
    }

    #[test]
    fn result_block_serialization() {
        let block = ResultBlock::new(
            "How fast is light in a vacuum?",
            vec![SearchHit::new("Speed of light", "https://example.com", "299,792,458 m/s")],
        );
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains("subquestion"));
        assert!(json.contains("299,792,458"));
    }
}
