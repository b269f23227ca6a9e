use serde::{Deserialize, Serialize};

// ── Conversation ─────────────────────────────────────────────────────────

/// One turn in a session's conversation. Append-only, immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum Turn {
    User(String),
    #[serde(rename = "ai")]
    Assistant(String),
}

impl Turn {
    pub fn text(&self) -> &str {
        match self {
            Turn::User(t) | Turn::Assistant(t) => t,
        }
    }
}

/// Basic information about one chat session, as listed by the sessions API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    pub title: String,
}

// ── Routing ──────────────────────────────────────────────────────────────

/// Classification of the latest user turn. Transient, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    LegalQuery,
    GeneralConversation,
}

impl RouteDecision {
    /// Parse the router model's raw output. The model is instructed to emit
    /// exactly one label, but real output sometimes carries stray whitespace
    /// or prose around it.
    pub fn parse(raw: &str) -> Self {
        if raw.contains("legal_query") {
            Self::LegalQuery
        } else {
            Self::GeneralConversation
        }
    }
}

// ── Research plan ────────────────────────────────────────────────────────

/// Structured research plan produced by the planner model for a legal query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPlan {
    /// Brief justification for the chosen research strategy.
    pub justification: String,
    /// True when the query is general enough to answer from model knowledge.
    #[serde(default)]
    pub direct_answer_possible: bool,
    /// Self-contained query for local document search, when planned.
    #[serde(default)]
    pub rag_query: Option<String>,
    /// Self-contained query for web search, when planned.
    #[serde(default)]
    pub web_query: Option<String>,
}

impl ActionPlan {
    /// Derive the single research strategy this plan calls for.
    ///
    /// The direct-answer flag wins even when sub-queries are also set, and a
    /// plan with nothing set degrades to answering from general knowledge.
    pub fn strategy(&self) -> ResearchStrategy {
        if self.direct_answer_possible {
            return ResearchStrategy::DirectAnswer;
        }
        match (self.rag_query.as_deref(), self.web_query.as_deref()) {
            (Some(_), Some(_)) => ResearchStrategy::RagAndWeb,
            (Some(_), None) => ResearchStrategy::RagOnly,
            (None, Some(_)) => ResearchStrategy::WebOnly,
            (None, None) => ResearchStrategy::NoStrategy,
        }
    }
}

/// The research route a plan resolves to, derived once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchStrategy {
    DirectAnswer,
    RagOnly,
    WebOnly,
    RagAndWeb,
    /// Nothing planned at all; answered from general knowledge.
    NoStrategy,
}

impl ResearchStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DirectAnswer => "direct",
            Self::RagOnly => "rag",
            Self::WebOnly => "web",
            Self::RagAndWeb => "rag+web",
            Self::NoStrategy => "none",
        }
    }
}

// ── Research results ─────────────────────────────────────────────────────

/// Why a research channel produced no content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The plan did not request this channel.
    NotPlanned,
    /// The plan requested this channel but no provider is configured.
    NotConfigured,
    /// The whole executor was bypassed for a direct answer.
    DirectAnswer,
}

/// Outcome of one research channel. A failure never aborts the request; it
/// renders as an error sentinel the synthesizer can still work with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    Found(String),
    Skipped(SkipReason),
    Failed(String),
}

impl ChannelOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Render the text handed to the synthesizer. `failure_text` is the
    /// channel-specific error sentinel.
    fn render(&self, failure_text: &str) -> String {
        match self {
            Self::Found(text) => text.clone(),
            Self::Skipped(SkipReason::NotPlanned) => "Not used.".into(),
            Self::Skipped(SkipReason::NotConfigured) => {
                "Not used. (Web search provider not configured.)".into()
            }
            Self::Skipped(SkipReason::DirectAnswer) => {
                "Not used. (Answered from general knowledge.)".into()
            }
            Self::Failed(_) => failure_text.into(),
        }
    }
}

/// Per-request research output, one outcome per channel. Never cached.
#[derive(Debug, Clone)]
pub struct ResearchFindings {
    pub rag: ChannelOutcome,
    pub web: ChannelOutcome,
}

impl ResearchFindings {
    /// Findings for a request that bypassed the executor entirely.
    pub fn bypassed() -> Self {
        Self {
            rag: ChannelOutcome::Skipped(SkipReason::DirectAnswer),
            web: ChannelOutcome::Skipped(SkipReason::DirectAnswer),
        }
    }

    pub fn rag_text(&self) -> String {
        self.rag.render("Error: Could not retrieve local documents.")
    }

    pub fn web_text(&self) -> String {
        self.web.render("Error: Could not retrieve web search results.")
    }
}

// ── Response envelopes ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Adaptive,
    Error,
}

/// Modern response envelope: the answer text plus derived metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveResponse {
    pub response: String,
    pub session_id: String,
    pub response_type: ResponseType,
    pub metadata: serde_json::Value,
}

/// One source document reference, kept for wire compatibility. The legacy
/// formatter never fills this in; research sources are not threaded through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub source: String,
    pub page_content: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Legacy structured response, derived from the adaptive answer text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyResponse {
    pub explanation: String,
    pub relevant_sections: Vec<String>,
    pub summary: String,
    pub disclaimer: String,
    pub sources: Vec<SourceDocument>,
}
