//! The Atlas research pipeline.
//!
//! Three stages composed into a fixed sequence, executed once per question:
//!
//! 1. [`Planner`] — one question → 0–6 sub-questions (one LLM call)
//! 2. [`Searcher`] — one search call per sub-question, collected in order
//! 3. [`Synthesizer`] — hits (or the bare question) → final prose report
//!
//! Each stage has an explicit, typed input/output signature; the only
//! aggregate is [`ResearchReport`], built fresh per invocation and never
//! persisted.

pub mod planner;
pub mod searcher;
pub mod synthesizer;

pub use planner::Planner;
pub use searcher::Searcher;
pub use synthesizer::Synthesizer;

use atlas_config::AppConfig;
use atlas_core::error::Result;
use atlas_core::search::{ResultBlock, SearchBackend};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// The outcome of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchReport {
    pub question: String,
    pub subquestions: Vec<String>,
    pub blocks: Vec<ResultBlock>,
    pub report: String,
}

/// The composed pipeline. Build once, run per question; runs share no state.
pub struct Pipeline {
    planner: Planner,
    searcher: Searcher,
    synthesizer: Synthesizer,
}

impl Pipeline {
    pub fn new(planner: Planner, searcher: Searcher, synthesizer: Synthesizer) -> Self {
        Self {
            planner,
            searcher,
            synthesizer,
        }
    }

    /// Build the full pipeline from configuration.
    ///
    /// Fails when the mandatory LLM credential is missing. Missing search
    /// credentials merely disable the search stage.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider: Arc<dyn atlas_core::Provider> =
            Arc::new(atlas_providers::build_provider(config)?);

        let backend: Option<Arc<dyn SearchBackend>> = atlas_search::build_search_backend(config)
            .map(|b| Arc::new(b) as Arc<dyn SearchBackend>);

        let planner = Planner::new(Arc::clone(&provider), &config.model)
            .with_temperature(config.temperature);
        let searcher = Searcher::new(backend)
            .with_results_per_query(config.pipeline.results_per_query)
            .with_concurrency(config.pipeline.search_concurrency);
        let synthesizer = Synthesizer::new(provider, &config.model)
            .with_temperature(config.temperature);

        Ok(Self::new(planner, searcher, synthesizer))
    }

    /// Whether the search stage has a configured backend.
    pub fn search_enabled(&self) -> bool {
        self.searcher.enabled()
    }

    /// Run the pipeline end to end for one question.
    pub async fn run(&self, question: &str) -> Result<ResearchReport> {
        info!(question_chars = question.len(), "Pipeline run starting");

        let subquestions = self.planner.plan(question).await?;
        let blocks = self.searcher.search_all(&subquestions).await;
        let report = self.synthesizer.synthesize(question, &blocks).await?;

        info!(
            subquestions = subquestions.len(),
            report_chars = report.len(),
            "Pipeline run complete"
        );

        Ok(ResearchReport {
            question: question.to_string(),
            subquestions,
            blocks,
            report,
        })
    }
}
