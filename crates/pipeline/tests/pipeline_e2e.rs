//! End-to-end tests for the Atlas research pipeline.
//!
//! These exercise the full plan → search → synthesize flow against scripted
//! providers and stub search backends, asserting on the exact requests each
//! stage sends as well as the final report.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use atlas_core::error::{ProviderError, SearchError};
use atlas_core::message::{Message, Role};
use atlas_core::provider::{CompletionRequest, CompletionResponse, Provider};
use atlas_core::search::{SearchBackend, SearchHit};
use atlas_pipeline::{Pipeline, Planner, Searcher, Synthesizer};

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted responses in sequence and records
/// every request it receives.
struct ScriptedProvider {
    responses: Mutex<Vec<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<&str>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().rev().map(|s| s.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> CompletionRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let text = self
            .responses
            .lock()
            .unwrap()
            .pop()
            .expect("ScriptedProvider exhausted");
        Ok(CompletionResponse {
            message: Message::assistant(text),
            usage: None,
            model: "scripted".into(),
        })
    }
}

// ── Stub search backends ─────────────────────────────────────────────────

/// Returns a fixed hit per query and counts calls.
struct CountingBackend {
    calls: Mutex<usize>,
    empty: bool,
}

impl CountingBackend {
    fn hits() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(0),
            empty: false,
        })
    }

    fn empty() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(0),
            empty: true,
        })
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl SearchBackend for CountingBackend {
    fn name(&self) -> &str {
        "counting"
    }

    async fn search(
        &self,
        query: &str,
        _num_results: u32,
    ) -> Result<Vec<SearchHit>, SearchError> {
        *self.calls.lock().unwrap() += 1;
        if self.empty {
            Ok(Vec::new())
        } else {
            Ok(vec![SearchHit::new(
                format!("Result for {query}"),
                "https://example.com",
                format!("Snippet about {query}"),
            )])
        }
    }
}

/// Fails every call.
struct FailingBackend;

#[async_trait]
impl SearchBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    async fn search(&self, _query: &str, _num: u32) -> Result<Vec<SearchHit>, SearchError> {
        Err(SearchError::Network("dns failure".into()))
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn pipeline(
    provider: Arc<ScriptedProvider>,
    backend: Option<Arc<dyn SearchBackend>>,
) -> Pipeline {
    Pipeline::new(
        Planner::new(provider.clone(), "scripted"),
        Searcher::new(backend),
        Synthesizer::new(provider, "scripted"),
    )
}

const PLAN: &str = "- How fast does light travel in a vacuum?\n\
                    - Does the medium affect the speed of light?";

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn llm_only_mode_produces_report_without_search_calls() {
    let provider = ScriptedProvider::new(vec![PLAN, "Light travels at 299,792,458 m/s."]);
    let pipeline = pipeline(provider.clone(), None);

    let result = pipeline.run("What is the speed of light?").await.unwrap();

    assert!(!result.report.is_empty());
    assert_eq!(result.subquestions.len(), 2);
    assert_eq!(result.blocks.len(), 2);
    assert!(result.blocks.iter().all(|b| b.hits.is_empty()));
    assert_eq!(provider.calls(), 2); // plan + synthesize, no search anywhere

    // The fallback path must not include a context section
    let synth_request = provider.request(1);
    let human = synth_request
        .messages
        .iter()
        .find(|m| m.role == Role::User)
        .unwrap();
    assert!(!human.content.contains("Context from searches:"));
    assert!(human.content.contains("What is the speed of light?"));
}

#[tokio::test]
async fn empty_question_short_circuits_to_fallback() {
    // Only the synthesizer runs: the planner never calls the provider.
    let provider = ScriptedProvider::new(vec!["I need a question to answer."]);
    let backend = CountingBackend::hits();
    let pipeline = pipeline(provider.clone(), Some(backend.clone()));

    let result = pipeline.run("").await.unwrap();

    assert!(result.subquestions.is_empty());
    assert!(result.blocks.is_empty());
    assert!(!result.report.is_empty());
    assert_eq!(provider.calls(), 1);
    assert_eq!(backend.calls(), 0);

    let synth_request = provider.request(0);
    let system = synth_request
        .messages
        .iter()
        .find(|m| m.role == Role::System)
        .unwrap();
    assert!(system.content.contains("don't fabricate citations"));
}

#[tokio::test]
async fn empty_search_results_use_internal_knowledge_path() {
    let provider = ScriptedProvider::new(vec![PLAN, "Report from internal knowledge."]);
    let backend = CountingBackend::empty();
    let pipeline = pipeline(provider.clone(), Some(backend.clone()));

    let result = pipeline.run("What is the speed of light?").await.unwrap();

    assert_eq!(backend.calls(), 2); // searched, found nothing
    assert!(result.blocks.iter().all(|b| b.hits.is_empty()));
    assert_eq!(result.report, "Report from internal knowledge.");

    let synth_request = provider.request(1);
    let human = synth_request
        .messages
        .iter()
        .find(|m| m.role == Role::User)
        .unwrap();
    assert!(!human.content.contains("Context from searches:"));
}

#[tokio::test]
async fn usable_hits_flow_into_cited_context() {
    let provider = ScriptedProvider::new(vec![PLAN, "A structured, cited report."]);
    let backend = CountingBackend::hits();
    let pipeline = pipeline(provider.clone(), Some(backend.clone()));

    let result = pipeline.run("What is the speed of light?").await.unwrap();

    assert_eq!(result.report, "A structured, cited report.");
    assert_eq!(backend.calls(), 2);

    let synth_request = provider.request(1);
    let system = synth_request
        .messages
        .iter()
        .find(|m| m.role == Role::System)
        .unwrap();
    assert!(system.content.contains("Cite URLs"));

    let human = synth_request
        .messages
        .iter()
        .find(|m| m.role == Role::User)
        .unwrap();
    assert!(human.content.contains("Context from searches:"));
    assert_eq!(human.content.matches("Sub-question: ").count(), 2);
    assert!(human.content.contains("How fast does light travel in a vacuum?"));
}

#[tokio::test]
async fn failing_search_still_produces_a_report() {
    let provider = ScriptedProvider::new(vec![PLAN, "Report despite search failure."]);
    let pipeline = pipeline(provider.clone(), Some(Arc::new(FailingBackend)));

    let result = pipeline.run("What is the speed of light?").await.unwrap();

    // Every block carries exactly the synthetic error hit
    assert_eq!(result.blocks.len(), 2);
    for block in &result.blocks {
        assert_eq!(block.hits.len(), 1);
        assert_eq!(block.hits[0].title, "Error");
        assert!(block.hits[0].link.is_empty());
        assert!(block.hits[0].snippet.contains("dns failure"));
    }

    assert_eq!(result.report, "Report despite search failure.");
}

#[tokio::test]
async fn subquestion_correspondence_is_positional() {
    let provider = ScriptedProvider::new(vec![PLAN, "Done."]);
    let backend = CountingBackend::hits();
    let pipeline = pipeline(provider.clone(), Some(backend));

    let result = pipeline.run("What is the speed of light?").await.unwrap();

    assert_eq!(result.subquestions.len(), result.blocks.len());
    for (sq, block) in result.subquestions.iter().zip(&result.blocks) {
        assert_eq!(sq, &block.subquestion);
    }
}
