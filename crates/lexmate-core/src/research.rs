//! Research provider seams and the plan executor.

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use crate::types::{ActionPlan, ChannelOutcome, ResearchFindings, SkipReason};

/// Document-retrieval capability: query string in, top-k relevant chunks out.
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<String>>;
}

/// Web-search capability: query string in, text digest of results out.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &str) -> Result<String>;
}

/// Run the plan's research channels and collect their outcomes.
///
/// Retrieval runs only when `rag_query` is set; web search runs only when
/// `web_query` is set and a searcher is configured. The two channels are
/// independent and run concurrently. A channel failure becomes
/// [`ChannelOutcome::Failed`] and never aborts the request.
pub async fn execute_plan(
    plan: &ActionPlan,
    retriever: Option<&dyn DocumentRetriever>,
    searcher: Option<&dyn WebSearcher>,
) -> ResearchFindings {
    let rag = run_retrieval(plan.rag_query.as_deref(), retriever);
    let web = run_web_search(plan.web_query.as_deref(), searcher);
    let (rag, web) = tokio::join!(rag, web);
    ResearchFindings { rag, web }
}

async fn run_retrieval(
    query: Option<&str>,
    retriever: Option<&dyn DocumentRetriever>,
) -> ChannelOutcome {
    let Some(query) = query else {
        return ChannelOutcome::Skipped(SkipReason::NotPlanned);
    };
    let Some(retriever) = retriever else {
        // The orchestrator rejects plans that need retrieval without a
        // configured retriever before getting here; this is a backstop.
        return ChannelOutcome::Skipped(SkipReason::NotConfigured);
    };
    match retriever.retrieve(query).await {
        Ok(chunks) => ChannelOutcome::Found(chunks.join("\n\n---\n\n")),
        Err(e) => {
            warn!("document retrieval failed: {e:#}");
            ChannelOutcome::Failed(e.to_string())
        }
    }
}

async fn run_web_search(query: Option<&str>, searcher: Option<&dyn WebSearcher>) -> ChannelOutcome {
    let Some(query) = query else {
        return ChannelOutcome::Skipped(SkipReason::NotPlanned);
    };
    let Some(searcher) = searcher else {
        return ChannelOutcome::Skipped(SkipReason::NotConfigured);
    };
    match searcher.search(query).await {
        Ok(digest) => ChannelOutcome::Found(digest),
        Err(e) => {
            warn!("web search failed: {e:#}");
            ChannelOutcome::Failed(e.to_string())
        }
    }
}
