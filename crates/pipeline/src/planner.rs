//! Planner stage — decomposes one question into focused sub-questions.
//!
//! One LLM call per run. Provider failures are fatal and propagate to the
//! caller; there is no retry and no degraded output for this stage.

use atlas_core::error::Result;
use atlas_core::message::Message;
use atlas_core::provider::{CompletionRequest, Provider};
use std::sync::Arc;
use tracing::{debug, info};

/// Sub-questions are capped even if the model returns more lines.
const MAX_SUBQUESTIONS: usize = 6;

/// Lines this short after trimming are treated as noise.
const MIN_SUBQUESTION_CHARS: usize = 3;

pub struct Planner {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
}

impl Planner {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Decompose a question into 0–6 sub-questions.
    ///
    /// An empty or whitespace-only question short-circuits to an empty plan
    /// without calling the provider.
    pub async fn plan(&self, question: &str) -> Result<Vec<String>> {
        let question = question.trim();
        if question.is_empty() {
            debug!("Empty question, skipping plan");
            return Ok(Vec::new());
        }

        let prompt = format!(
            "You are a research planner. Break the following question into 3-6 focused,\n\
             non-overlapping sub-questions that would help a search agent retrieve\n\
             the most relevant information.\n\n\
             Question:\n{question}\n\n\
             Return each sub-question as a separate line without numbering."
        );

        let request = CompletionRequest::new(&self.model, vec![Message::user(prompt)])
            .with_temperature(self.temperature);

        let response = self.provider.complete(request).await?;
        let subquestions = extract_lines(&response.message.content);

        info!(count = subquestions.len(), "Planned sub-questions");
        Ok(subquestions)
    }
}

/// Split a model response into cleaned sub-question lines.
///
/// Strips surrounding whitespace and `-`/`*` bullet markers, drops lines
/// with fewer than 3 remaining characters, and caps the list at 6.
fn extract_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().trim_matches(['-', '*', ' ']).trim())
        .filter(|line| line.chars().count() >= MIN_SUBQUESTION_CHARS)
        .map(str::to_string)
        .take(MAX_SUBQUESTIONS)
        .collect()
}
