use anyhow::Result;
use async_trait::async_trait;

use crate::types::Turn;

/// One chat-completion request to the underlying language model.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// System instruction. Empty means none.
    pub system: String,
    /// Prior conversation turns, oldest first.
    pub history: Vec<Turn>,
    /// The latest user-side message.
    pub input: String,
    /// Sampling temperature. Classification calls run at 0.0.
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, input: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: system.into(),
            history: Vec::new(),
            input: input.into(),
            temperature,
        }
    }

    pub fn with_history(mut self, history: &[Turn]) -> Self {
        self.history = history.to_vec();
        self
    }
}

/// Language-model capability: rendered prompt in, generated text out.
///
/// Implementations live in `lexmate-llm`; the pipeline only sees this trait
/// so backends stay swappable (and mockable in tests).
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn generate(&self, request: ChatRequest) -> Result<String>;
}
