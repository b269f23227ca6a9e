use anyhow::{Context, Result};
use async_trait::async_trait;
use lexmate_core::research::WebSearcher;
use serde::{Deserialize, Serialize};
use tracing::info;

const BASE: &str = "https://api.tavily.com";

/// Web search via the Tavily search API.
pub struct TavilySearcher {
    api_key: String,
    max_results: usize,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<SearchHit>,
}

impl TavilySearcher {
    pub fn new(api_key: &str, max_results: usize, timeout_secs: u64) -> Self {
        Self {
            api_key: api_key.to_string(),
            max_results,
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }
}

/// Flatten the search response into the text digest the synthesizer reads.
fn format_digest(response: &SearchResponse) -> String {
    let mut digest = String::new();
    if let Some(answer) = response.answer.as_deref().filter(|a| !a.is_empty()) {
        digest.push_str(answer);
        digest.push_str("\n\n");
    }
    for hit in &response.results {
        digest.push_str(&format!("- {} ({}): {}\n", hit.title, hit.url, hit.content));
    }
    digest.trim_end().to_string()
}

#[async_trait]
impl WebSearcher for TavilySearcher {
    async fn search(&self, query: &str) -> Result<String> {
        let body = SearchRequest {
            api_key: &self.api_key,
            query,
            max_results: self.max_results,
        };

        let response: SearchResponse = self
            .http
            .post(format!("{BASE}/search"))
            .json(&body)
            .send()
            .await
            .context("tavily request failed")?
            .error_for_status()
            .context("tavily returned an error status")?
            .json()
            .await
            .context("failed to parse tavily response")?;

        info!(results = response.results.len(), "web search complete");
        Ok(format_digest(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_includes_answer_and_hits() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"answer":"Short summary.","results":[
                {"title":"Ruling","url":"https://example.in/r","content":"Details here."}]}"#,
        )
        .unwrap();
        let digest = format_digest(&response);
        assert!(digest.starts_with("Short summary."));
        assert!(digest.contains("Ruling (https://example.in/r): Details here."));
    }

    #[test]
    fn empty_response_yields_empty_digest() {
        let response: SearchResponse = serde_json::from_str(r#"{"results":[]}"#).unwrap();
        assert_eq!(format_digest(&response), "");
    }
}
