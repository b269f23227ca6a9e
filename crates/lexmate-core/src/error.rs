use thiserror::Error;

/// Failures the pipeline can surface to a caller. Provider failures are not
/// listed here: they stay inside the research executor as channel sentinels
/// and never abort a request.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// A required credential or provider is missing. Surfaced before any
    /// model call runs, never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The caller's request is malformed (e.g. empty query).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The planner model returned something that does not parse as a plan.
    #[error("planner returned an invalid plan: {0}")]
    InvalidPlan(String),

    /// An underlying model call failed (router, planner, general responder,
    /// or synthesizer). The cause is logged server-side; callers get a
    /// generic apology.
    #[error("model call failed during {stage}: {source}")]
    Model {
        stage: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl AssistantError {
    pub fn model(stage: &'static str, source: anyhow::Error) -> Self {
        Self::Model { stage, source }
    }

    /// The caller-facing apology for this failure. Configuration problems
    /// name the keys; everything else stays generic.
    pub fn apology(&self) -> String {
        match self {
            Self::Configuration(msg) => format!(
                "I apologize, but I encountered an issue with the provided API keys: {msg}"
            ),
            Self::BadRequest(msg) => format!("I apologize, but the request was invalid: {msg}"),
            _ => "I apologize, but I encountered an issue processing your request. \
                  Please try again later."
                .into(),
        }
    }
}
