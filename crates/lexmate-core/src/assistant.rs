//! The request orchestrator: route → plan → research → synthesize, with
//! session history injected before and recorded after.

use std::sync::Arc;

use tracing::{error, info};

use crate::error::AssistantError;
use crate::llm::{ChatRequest, LlmBackend};
use crate::plan::parse_action_plan;
use crate::prompts;
use crate::research::{execute_plan, DocumentRetriever, WebSearcher};
use crate::respond;
use crate::session::SessionStore;
use crate::types::{
    ActionPlan, AdaptiveResponse, LegacyResponse, ResearchFindings, ResearchStrategy,
    RouteDecision, Turn,
};

const ROUTER_TEMPERATURE: f32 = 0.0;
const PLANNER_TEMPERATURE: f32 = 0.0;
const SYNTHESIZER_TEMPERATURE: f32 = 0.3;
const GENERAL_TEMPERATURE: f32 = 0.5;

/// One fully-wired assistant pipeline.
///
/// Stateless apart from the injected session store: the server builds one
/// per request from caller-supplied credentials, so overlapping requests
/// never share model or provider state.
pub struct Assistant {
    llm: Arc<dyn LlmBackend>,
    retriever: Option<Arc<dyn DocumentRetriever>>,
    searcher: Option<Arc<dyn WebSearcher>>,
    sessions: Arc<SessionStore>,
}

impl Assistant {
    pub fn new(
        llm: Arc<dyn LlmBackend>,
        retriever: Option<Arc<dyn DocumentRetriever>>,
        searcher: Option<Arc<dyn WebSearcher>>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            llm,
            retriever,
            searcher,
            sessions,
        }
    }

    /// Run the full pipeline for one conversational turn and return the raw
    /// answer text. The (user, assistant) pair is recorded only after the
    /// terminal stage succeeds; a failed request leaves history untouched.
    pub async fn ask(&self, query: &str, session_id: &str) -> Result<String, AssistantError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AssistantError::BadRequest("query must not be empty".into()));
        }

        let history = self.sessions.history(session_id).await;
        let decision = self.route(query, &history).await?;
        info!(session_id, route = route_label(decision), "query routed");

        let answer = match decision {
            RouteDecision::GeneralConversation => self.general(query, &history).await?,
            RouteDecision::LegalQuery => self.legal(query, &history, session_id).await?,
        };

        self.sessions.append_exchange(session_id, query, &answer).await;
        Ok(answer)
    }

    /// Run [`Self::ask`] and wrap the result in the adaptive envelope.
    /// Pipeline failures become `response_type: "error"` envelopes; the real
    /// cause is logged here, never surfaced raw.
    pub async fn ask_adaptive(&self, query: &str, session_id: &str) -> AdaptiveResponse {
        match self.ask(query, session_id).await {
            Ok(answer) => respond::adaptive_response(query, answer, session_id.to_string()),
            Err(e) => {
                error!(session_id, "request failed: {e:#}");
                respond::error_response(e.apology(), session_id.to_string())
            }
        }
    }

    /// Run [`Self::ask`] and post-process the answer into the legacy shape.
    pub async fn ask_legacy(
        &self,
        query: &str,
        session_id: &str,
    ) -> Result<LegacyResponse, AssistantError> {
        let answer = self.ask(query, session_id).await?;
        Ok(respond::to_legacy(&answer))
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    // ── Pipeline stages ──────────────────────────────────────────────────

    async fn route(&self, query: &str, history: &[Turn]) -> Result<RouteDecision, AssistantError> {
        let request = ChatRequest::new(prompts::ROUTER_SYSTEM, query, ROUTER_TEMPERATURE)
            .with_history(history);
        let raw = self
            .llm
            .generate(request)
            .await
            .map_err(|e| AssistantError::model("routing", e))?;
        Ok(RouteDecision::parse(&raw))
    }

    async fn general(&self, query: &str, history: &[Turn]) -> Result<String, AssistantError> {
        let request = ChatRequest::new(prompts::GENERAL_SYSTEM, query, GENERAL_TEMPERATURE)
            .with_history(history);
        self.llm
            .generate(request)
            .await
            .map_err(|e| AssistantError::model("general response", e))
    }

    async fn legal(
        &self,
        query: &str,
        history: &[Turn],
        session_id: &str,
    ) -> Result<String, AssistantError> {
        let plan = self.plan(query, history).await?;
        let strategy = plan.strategy();
        info!(
            session_id,
            strategy = strategy.label(),
            justification = %plan.justification,
            "research plan ready"
        );

        let findings = match strategy {
            ResearchStrategy::DirectAnswer | ResearchStrategy::NoStrategy => {
                ResearchFindings::bypassed()
            }
            _ => {
                execute_plan(
                    &plan,
                    self.retriever.as_deref(),
                    self.searcher.as_deref(),
                )
                .await
            }
        };

        self.synthesize(query, &findings).await
    }

    async fn plan(&self, query: &str, history: &[Turn]) -> Result<ActionPlan, AssistantError> {
        let current_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let prompt = prompts::render_planner_prompt(query, history, &current_date);
        let raw = self
            .llm
            .generate(ChatRequest::new("", prompt, PLANNER_TEMPERATURE))
            .await
            .map_err(|e| AssistantError::model("planning", e))?;
        parse_action_plan(&raw)
    }

    async fn synthesize(
        &self,
        query: &str,
        findings: &ResearchFindings,
    ) -> Result<String, AssistantError> {
        let system = prompts::render_synthesizer_system(&findings.rag_text(), &findings.web_text());
        let input = prompts::render_synthesizer_input(query);
        self.llm
            .generate(ChatRequest::new(system, input, SYNTHESIZER_TEMPERATURE))
            .await
            .map_err(|e| AssistantError::model("synthesis", e))
    }
}

fn route_label(decision: RouteDecision) -> &'static str {
    match decision {
        RouteDecision::LegalQuery => "legal_query",
        RouteDecision::GeneralConversation => "general_conversation",
    }
}
