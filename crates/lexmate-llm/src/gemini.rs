use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use lexmate_core::llm::{ChatRequest, LlmBackend};
use lexmate_core::types::Turn;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Calls the Google Gemini `generateContent` REST API.
///
/// Built per request from the caller's API key; holds no session state. The
/// key travels in the `x-goog-api-key` header so it never appears in URLs
/// or logs.
pub struct GeminiBackend {
    base_url: String,
    model: String,
    api_key: String,
    timeout_secs: u64,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            model: model.into(),
            api_key: api_key.into(),
            timeout_secs: 60,
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

fn content(role: &str, text: &str) -> Content {
    Content {
        role: Some(role.to_string()),
        parts: vec![Part { text: text.to_string() }],
    }
}

/// Map a pipeline chat request to the Gemini wire shape. History turns map
/// to alternating `user`/`model` contents; the latest input goes last.
fn build_request(request: &ChatRequest) -> GenerateContentRequest {
    let system_instruction = if request.system.is_empty() {
        None
    } else {
        Some(Content {
            role: None,
            parts: vec![Part { text: request.system.clone() }],
        })
    };

    let mut contents = Vec::with_capacity(request.history.len() + 1);
    for turn in &request.history {
        match turn {
            Turn::User(text) => contents.push(content("user", text)),
            Turn::Assistant(text) => contents.push(content("model", text)),
        }
    }
    contents.push(content("user", &request.input));

    GenerateContentRequest {
        system_instruction,
        contents,
        generation_config: GenerationConfig {
            temperature: request.temperature,
        },
    }
}

fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let parts = candidate.content?.parts;
    if parts.is_empty() {
        return None;
    }
    Some(
        parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join(""),
    )
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    async fn generate(&self, request: ChatRequest) -> Result<String> {
        let body = build_request(&request);
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        info!(
            model = %self.model,
            history_turns = request.history.len(),
            temperature = request.temperature,
            "calling gemini generateContent"
        );

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()
            .context("building http client")?;

        let response = client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("gemini request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("gemini returned {status}: {body}"));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("failed to parse gemini response")?;

        extract_text(parsed).ok_or_else(|| anyhow!("gemini response contained no text candidate"))
    }
}
