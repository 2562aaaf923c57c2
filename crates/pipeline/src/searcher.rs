//! Searcher stage — one search call per sub-question.
//!
//! Failure isolation is per sub-question: a failing call becomes a single
//! synthetic error hit in that sub-question's block, never an aborted batch.
//! With no backend configured, every block simply comes back empty.

use atlas_core::search::{ResultBlock, SearchBackend, SearchHit};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Searcher {
    backend: Option<Arc<dyn SearchBackend>>,
    results_per_query: u32,
    concurrency: usize,
}

impl Searcher {
    pub fn new(backend: Option<Arc<dyn SearchBackend>>) -> Self {
        Self {
            backend,
            results_per_query: 5,
            concurrency: 4,
        }
    }

    pub fn with_results_per_query(mut self, results_per_query: u32) -> Self {
        self.results_per_query = results_per_query;
        self
    }

    /// Worker limit for the fan-out. Sub-question searches are independent,
    /// so they run concurrently up to this bound; results join in input order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Search every sub-question, returning exactly one block per input,
    /// in input order. Infallible: failures are recorded inside the blocks.
    pub async fn search_all(&self, subquestions: &[String]) -> Vec<ResultBlock> {
        let Some(backend) = &self.backend else {
            info!(count = subquestions.len(), "Search disabled, returning empty blocks");
            return subquestions.iter().map(ResultBlock::empty).collect();
        };

        let num = self.results_per_query;
        let blocks: Vec<ResultBlock> = futures::stream::iter(subquestions.iter().cloned())
            .map(|sq| {
                let backend = Arc::clone(backend);
                async move {
                    match backend.search(&sq, num).await {
                        Ok(hits) => ResultBlock::new(sq, hits),
                        Err(e) => {
                            warn!(subquestion = %sq, error = %e, "Search call failed");
                            ResultBlock::new(sq, vec![SearchHit::error(e.to_string())])
                        }
                    }
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let hit_total: usize = blocks.iter().map(|b| b.hits.len()).sum();
        info!(blocks = blocks.len(), hits = hit_total, "Search complete");
        blocks
    }
}
