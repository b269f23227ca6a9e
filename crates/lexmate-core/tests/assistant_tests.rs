// End-to-end pipeline tests against a scripted language model and spy
// research providers. Covers the routing branch, every research strategy,
// fault isolation, history atomicity, and the error envelope.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use lexmate_core::assistant::Assistant;
use lexmate_core::error::AssistantError;
use lexmate_core::llm::{ChatRequest, LlmBackend};
use lexmate_core::prompts::DISCLAIMER;
use lexmate_core::research::{DocumentRetriever, WebSearcher};
use lexmate_core::session::SessionStore;
use lexmate_core::types::ResponseType;

// ── scripted model ─────────────────────────────────────────────────────────

/// Answers each pipeline stage from a fixed script, keyed off the prompt
/// text, and records every request it sees.
struct ScriptedLlm {
    route_reply: String,
    plan_reply: String,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    fn new(route_reply: &str, plan_reply: &str) -> Arc<Self> {
        Arc::new(Self {
            route_reply: route_reply.to_string(),
            plan_reply: plan_reply.to_string(),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn synthesizer_request(&self) -> Option<ChatRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.system.contains("Indian Legal Analyst"))
            .cloned()
    }

    fn stage_count(&self, marker: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.system.contains(marker) || r.input.contains(marker))
            .count()
    }
}

#[async_trait]
impl LlmBackend for ScriptedLlm {
    async fn generate(&self, request: ChatRequest) -> Result<String> {
        let reply = if request.system.contains("classification engine") {
            self.route_reply.clone()
        } else if request.input.contains("research strategist") {
            self.plan_reply.clone()
        } else if request.system.contains("Indian Legal Analyst") {
            format!("Here is the legal analysis. {DISCLAIMER}")
        } else {
            "Hello! I am an informational tool for Indian law.".to_string()
        };
        self.requests.lock().unwrap().push(request);
        Ok(reply)
    }
}

/// A model that fails at one stage.
struct FailingLlm {
    fail_on: &'static str,
    route_reply: String,
}

#[async_trait]
impl LlmBackend for FailingLlm {
    async fn generate(&self, request: ChatRequest) -> Result<String> {
        if request.system.contains(self.fail_on) || request.input.contains(self.fail_on) {
            return Err(anyhow!("upstream model error"));
        }
        Ok(self.route_reply.clone())
    }
}

// ── spy providers ──────────────────────────────────────────────────────────

#[derive(Default)]
struct SpyRetriever {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl DocumentRetriever for SpyRetriever {
    async fn retrieve(&self, _query: &str) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("chroma down"));
        }
        Ok(vec!["Article 21: Protection of life and personal liberty.".into()])
    }
}

#[derive(Default)]
struct SpySearcher {
    calls: AtomicUsize,
}

#[async_trait]
impl WebSearcher for SpySearcher {
    async fn search(&self, _query: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("Recent ruling digest.".into())
    }
}

fn rag_only_plan() -> &'static str {
    r#"{"justification": "article number", "direct_answer_possible": false,
        "rag_query": "content and explanation of Article 21", "web_query": null}"#
}

fn combined_plan() -> &'static str {
    r#"{"justification": "recency plus article number", "direct_answer_possible": false,
        "rag_query": "text of Article 21", "web_query": "latest SC rulings on Article 21"}"#
}

fn direct_plan() -> &'static str {
    r#"{"justification": "broad concept", "direct_answer_possible": true}"#
}

fn build(
    llm: Arc<dyn LlmBackend>,
    retriever: Option<Arc<SpyRetriever>>,
    searcher: Option<Arc<SpySearcher>>,
) -> Assistant {
    Assistant::new(
        llm,
        retriever.map(|r| r as Arc<dyn DocumentRetriever>),
        searcher.map(|s| s as Arc<dyn WebSearcher>),
        SessionStore::new(),
    )
}

// ── scenario 1: general conversation ───────────────────────────────────────

#[tokio::test]
async fn greeting_takes_the_general_branch() {
    let llm = ScriptedLlm::new("general_conversation", direct_plan());
    let retriever = Arc::new(SpyRetriever::default());
    let searcher = Arc::new(SpySearcher::default());
    let assistant = build(llm.clone(), Some(retriever.clone()), Some(searcher.clone()));

    let answer = assistant.ask("Hello!", "s1").await.unwrap();

    assert!(!answer.is_empty());
    assert_eq!(retriever.calls.load(Ordering::SeqCst), 0);
    assert_eq!(searcher.calls.load(Ordering::SeqCst), 0);
    // No planner or synthesizer call on the general branch.
    assert_eq!(llm.stage_count("research strategist"), 0);
    assert_eq!(llm.stage_count("Indian Legal Analyst"), 0);
    // The exchange is still recorded.
    assert_eq!(assistant.sessions().history("s1").await.len(), 2);
}

// ── scenario 2: RAG-only legal query ───────────────────────────────────────

#[tokio::test]
async fn article_query_runs_retrieval_only_and_carries_disclaimer() {
    let llm = ScriptedLlm::new("legal_query", rag_only_plan());
    let retriever = Arc::new(SpyRetriever::default());
    let searcher = Arc::new(SpySearcher::default());
    let assistant = build(llm.clone(), Some(retriever.clone()), Some(searcher.clone()));

    let answer = assistant.ask("What is Article 21?", "s1").await.unwrap();

    assert_eq!(retriever.calls.load(Ordering::SeqCst), 1);
    assert_eq!(searcher.calls.load(Ordering::SeqCst), 0);
    assert!(answer.contains(DISCLAIMER));

    let synth = llm.synthesizer_request().unwrap();
    assert!(synth.system.contains("Protection of life and personal liberty"));
    assert!(synth.system.contains("Web Search Results: Not used."));
}

// ── scenario 3: combined research ──────────────────────────────────────────

#[tokio::test]
async fn recency_plus_citation_invokes_both_providers() {
    let llm = ScriptedLlm::new("legal_query", combined_plan());
    let retriever = Arc::new(SpyRetriever::default());
    let searcher = Arc::new(SpySearcher::default());
    let assistant = build(llm.clone(), Some(retriever.clone()), Some(searcher.clone()));

    assistant
        .ask("What is the latest Supreme Court ruling on Article 21?", "s1")
        .await
        .unwrap();

    assert_eq!(retriever.calls.load(Ordering::SeqCst), 1);
    assert_eq!(searcher.calls.load(Ordering::SeqCst), 1);

    let synth = llm.synthesizer_request().unwrap();
    assert!(synth.system.contains("Recent ruling digest."));
}

// ── direct answer ──────────────────────────────────────────────────────────

#[tokio::test]
async fn direct_answer_bypasses_the_executor() {
    let llm = ScriptedLlm::new("legal_query", direct_plan());
    let retriever = Arc::new(SpyRetriever::default());
    let searcher = Arc::new(SpySearcher::default());
    let assistant = build(llm.clone(), Some(retriever.clone()), Some(searcher.clone()));

    let answer = assistant.ask("What is the rule of law?", "s1").await.unwrap();

    assert_eq!(retriever.calls.load(Ordering::SeqCst), 0);
    assert_eq!(searcher.calls.load(Ordering::SeqCst), 0);
    assert!(answer.contains(DISCLAIMER));

    let synth = llm.synthesizer_request().unwrap();
    assert!(synth.system.contains("Not used. (Answered from general knowledge.)"));
}

// ── fault isolation ────────────────────────────────────────────────────────

#[tokio::test]
async fn retrieval_failure_still_completes_the_request() {
    let llm = ScriptedLlm::new("legal_query", rag_only_plan());
    let retriever = Arc::new(SpyRetriever {
        fail: true,
        ..Default::default()
    });
    let assistant = build(llm.clone(), Some(retriever), None);

    let answer = assistant.ask("What is Article 21?", "s1").await.unwrap();
    assert!(answer.contains(DISCLAIMER));

    let synth = llm.synthesizer_request().unwrap();
    assert!(synth.system.contains("Error: Could not retrieve local documents."));
}

// ── failures leave no partial history ──────────────────────────────────────

#[tokio::test]
async fn invalid_plan_fails_the_request_without_recording_turns() {
    let llm = ScriptedLlm::new("legal_query", "this is not a plan");
    let assistant = build(llm, Some(Arc::new(SpyRetriever::default())), None);

    let err = assistant.ask("What is Article 21?", "s1").await.unwrap_err();
    assert!(matches!(err, AssistantError::InvalidPlan(_)));
    assert!(assistant.sessions().history("s1").await.is_empty());
}

#[tokio::test]
async fn router_failure_propagates() {
    let llm = Arc::new(FailingLlm {
        fail_on: "classification engine",
        route_reply: String::new(),
    });
    let assistant = build(llm, None, None);

    let err = assistant.ask("Hello!", "s1").await.unwrap_err();
    assert!(matches!(err, AssistantError::Model { stage: "routing", .. }));
}

#[tokio::test]
async fn empty_query_is_rejected_before_any_model_call() {
    let llm = ScriptedLlm::new("general_conversation", direct_plan());
    let assistant = build(llm.clone(), None, None);

    let err = assistant.ask("   ", "s1").await.unwrap_err();
    assert!(matches!(err, AssistantError::BadRequest(_)));
    assert!(llm.requests.lock().unwrap().is_empty());
}

// ── adaptive envelope ──────────────────────────────────────────────────────

#[tokio::test]
async fn adaptive_envelope_carries_metadata_on_success() {
    let llm = ScriptedLlm::new("legal_query", rag_only_plan());
    let assistant = build(llm, Some(Arc::new(SpyRetriever::default())), None);

    let response = assistant.ask_adaptive("What is Article 21?", "s9").await;
    assert_eq!(response.response_type, ResponseType::Adaptive);
    assert_eq!(response.session_id, "s9");
    assert_eq!(response.metadata["query_type"], "explanatory");
    assert!(response.response.contains(DISCLAIMER));
}

#[tokio::test]
async fn adaptive_envelope_reports_errors_without_leaking_causes() {
    let llm = ScriptedLlm::new("legal_query", "garbage");
    let assistant = build(llm, Some(Arc::new(SpyRetriever::default())), None);

    let response = assistant.ask_adaptive("What is Article 21?", "s9").await;
    assert_eq!(response.response_type, ResponseType::Error);
    assert_eq!(response.metadata["error"], response.response);
    assert!(response.response.starts_with("I apologize"));
    assert!(!response.response.contains("garbage"));
}

// ── concurrent requests on one session ─────────────────────────────────────

#[tokio::test]
async fn concurrent_requests_on_one_session_record_all_pairs() {
    let llm = ScriptedLlm::new("general_conversation", direct_plan());
    let sessions = SessionStore::new();
    let assistant = Arc::new(Assistant::new(llm, None, None, sessions.clone()));

    let n = 20;
    let mut handles = Vec::new();
    for i in 0..n {
        let assistant = Arc::clone(&assistant);
        handles.push(tokio::spawn(async move {
            assistant.ask(&format!("Hello number {i}!"), "shared").await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    assert_eq!(sessions.history("shared").await.len(), 2 * n);
}
