//! Synthesizer stage — turns collected hits into the final report.
//!
//! Three mutually exclusive paths, evaluated in order:
//! - no hits at all → internal-knowledge mode
//! - hits exist but no usable context survives filtering → same fallback
//! - usable context → cited, structured report
//!
//! Provider failures propagate uncaught; a successful call always yields a
//! report.

use atlas_core::error::Result;
use atlas_core::message::Message;
use atlas_core::provider::{CompletionRequest, Provider};
use atlas_core::search::ResultBlock;
use std::sync::Arc;
use tracing::info;

/// At most this many hits per sub-question make it into the context.
const MAX_HITS_PER_CHUNK: usize = 5;

const INTERNAL_KNOWLEDGE_PROMPT: &str =
    "You are a senior research analyst. Answer the question using your internal \
     knowledge. If sources are unavailable, don't fabricate citations.";

const CITED_REPORT_PROMPT: &str =
    "You are a senior research analyst. Synthesize a clear, structured report\n\
     answering the main question using the provided context. Cite URLs where useful.\n\
     Use concise sections and bullet points when appropriate.";

pub struct Synthesizer {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
}

impl Synthesizer {
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

    /// Produce the final report for a question given its result blocks.
    pub async fn synthesize(&self, question: &str, blocks: &[ResultBlock]) -> Result<String> {
        let has_hits = blocks.iter().any(|b| !b.hits.is_empty());

        let (system, human) = if !has_hits {
            info!(path = "internal_knowledge", "No search results available");
            (
                INTERNAL_KNOWLEDGE_PROMPT.to_string(),
                format!("Main Question:\n{question}\n\nWrite the final report."),
            )
        } else {
            match build_context(blocks) {
                Some(context) => {
                    info!(path = "cited_context", chars = context.len(), "Synthesizing from context");
                    (
                        CITED_REPORT_PROMPT.to_string(),
                        format!(
                            "Main Question:\n{question}\n\nContext from searches:\n{context}\n\n\
                             Write the final report."
                        ),
                    )
                }
                None => {
                    // Hits existed but none carried usable text
                    info!(path = "internal_knowledge", "No usable context built");
                    (
                        INTERNAL_KNOWLEDGE_PROMPT.to_string(),
                        format!("Main Question:\n{question}\n\nWrite the final report."),
                    )
                }
            }
        };

        let request = CompletionRequest::new(
            &self.model,
            vec![Message::system(system), Message::user(human)],
        )
        .with_temperature(self.temperature);

        let response = self.provider.complete(request).await?;
        Ok(response.message.content)
    }
}

/// Build the context block from search results.
///
/// One chunk per sub-question with at least one hit carrying a non-empty
/// title or snippet; at most five hit lines per chunk; chunks joined by a
/// blank line. `None` when nothing usable survives.
fn build_context(blocks: &[ResultBlock]) -> Option<String> {
    let mut chunks: Vec<String> = Vec::new();

    for block in blocks {
        if block.hits.is_empty() {
            continue;
        }

        let lines: Vec<String> = block
            .hits
            .iter()
            .take(MAX_HITS_PER_CHUNK)
            .filter(|hit| !hit.title.is_empty() || !hit.snippet.is_empty())
            .map(|hit| format!("- {}: {}", hit.title, hit.snippet))
            .collect();

        if !lines.is_empty() {
            chunks.push(format!(
                "Sub-question: {}\n{}",
                block.subquestion,
                lines.join("\n")
            ));
        }
    }

    if chunks.is_empty() {
        None
    } else {
        Some(chunks.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::search::SearchHit;

    fn hit(title: &str, snippet: &str) -> SearchHit {
        SearchHit::new(title, "https://example.com", snippet)
    }

    #[test]
    fn context_none_for_empty_blocks() {
        assert!(build_context(&[]).is_none());
        assert!(build_context(&[ResultBlock::empty("a"), ResultBlock::empty("b")]).is_none());
    }

    #[test]
    fn context_none_when_hits_have_no_text() {
        let blocks = vec![ResultBlock::new("sq", vec![SearchHit::default()])];
        assert!(build_context(&blocks).is_none());
    }

    #[test]
    fn context_one_chunk_per_contributing_subquestion() {
        let blocks = vec![
            ResultBlock::new("How fast is light?", vec![hit("Speed of light", "fast")]),
            ResultBlock::empty("Skipped sub-question"),
            ResultBlock::new("What slows light down?", vec![hit("Refraction", "media")]),
        ];

        let context = build_context(&blocks).unwrap();
        assert_eq!(context.matches("Sub-question: ").count(), 2);
        assert!(context.contains("Sub-question: How fast is light?"));
        assert!(!context.contains("Skipped sub-question"));
        assert!(context.contains("- Speed of light: fast"));

        // Chunks are separated by a blank line
        assert!(context.contains("\n\nSub-question: What slows light down?"));
    }

    #[test]
    fn context_caps_hits_per_chunk() {
        let hits: Vec<SearchHit> = (0..8).map(|i| hit(&format!("t{i}"), "s")).collect();
        let blocks = vec![ResultBlock::new("sq", hits)];

        let context = build_context(&blocks).unwrap();
        assert_eq!(context.matches("\n- ").count(), MAX_HITS_PER_CHUNK);
        assert!(!context.contains("t5"));
    }

    #[test]
    fn error_hits_participate_in_context() {
        // The synthetic error hit has a title, so the synthesizer sees it
        // like any other hit and can mention the failure in the report.
        let blocks = vec![ResultBlock::new("sq", vec![SearchHit::error("quota exceeded")])];
        let context = build_context(&blocks).unwrap();
        assert!(context.contains("- Error: quota exceeded"));
    }
}
