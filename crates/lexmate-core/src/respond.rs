//! Response-format adaptation: derived metadata for the adaptive envelope
//! and the pure-formatting mapping to the legacy structured shape.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use crate::prompts::{DISCLAIMER, LEGACY_DISCLAIMER};
use crate::types::{AdaptiveResponse, LegacyResponse, ResponseType};

static SECTION_FLAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal
    Regex::new(r"Section \d+|Article \d+").unwrap()
});

static SECTION_EXTRACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal
    Regex::new(r"Section \d+[^.\n]*|Article \d+[^.\n]*").unwrap()
});

// ── Adaptive metadata ────────────────────────────────────────────────────

/// Coarse classification of what kind of answer the query wants.
pub fn analyze_query_type(query: &str) -> &'static str {
    let q = query.to_lowercase();
    let contains_any = |words: &[&str]| words.iter().any(|w| q.contains(w));
    if contains_any(&["how to", "procedure", "steps"]) {
        return "procedural";
    }
    if contains_any(&["what is", "define", "explain"]) {
        return "explanatory";
    }
    if contains_any(&["compare", "vs", "versus"]) {
        return "comparative";
    }
    if contains_any(&["example", "case", "scenario"]) {
        return "example-based";
    }
    if contains_any(&["brief", "quick", "summary"]) {
        return "concise";
    }
    "comprehensive"
}

/// Metadata attached to every adaptive response.
pub fn response_metadata(query: &str, response: &str) -> serde_json::Value {
    let word_count = response.split_whitespace().count();
    let complexity = if word_count < 100 {
        "simple"
    } else if word_count < 300 {
        "moderate"
    } else {
        "detailed"
    };
    json!({
        "query_type": analyze_query_type(query),
        "has_legal_sections": SECTION_FLAG_RE.is_match(response),
        "complexity": complexity,
        "word_count": word_count,
    })
}

/// Wrap a raw answer in the adaptive envelope.
pub fn adaptive_response(query: &str, response: String, session_id: String) -> AdaptiveResponse {
    let metadata = response_metadata(query, &response);
    AdaptiveResponse {
        response,
        session_id,
        response_type: ResponseType::Adaptive,
        metadata,
    }
}

/// The adaptive-shaped error envelope: the error text appears in both the
/// response body and `metadata.error`.
pub fn error_response(message: String, session_id: String) -> AdaptiveResponse {
    let metadata = json!({ "error": message });
    AdaptiveResponse {
        response: message,
        session_id,
        response_type: ResponseType::Error,
        metadata,
    }
}

// ── Legacy formatting ────────────────────────────────────────────────────

/// Map an adaptive answer to the legacy structured shape.
///
/// Pure text post-processing: markdown `## ` headings and the canonical
/// disclaimer are stripped from the explanation, cited sections are
/// extracted and deduplicated, and the summary is the explanation's first
/// two sentences. Research sources are not threaded through to this shape;
/// `sources` stays empty.
pub fn to_legacy(answer: &str) -> LegacyResponse {
    let explanation: String = answer
        .lines()
        .filter(|line| !line.trim_start().starts_with("## "))
        .collect::<Vec<_>>()
        .join("\n");
    let explanation = explanation.replace(DISCLAIMER, "").trim().to_string();

    let mut relevant_sections: Vec<String> = Vec::new();
    for m in SECTION_EXTRACT_RE.find_iter(answer) {
        let s = m.as_str().to_string();
        if !relevant_sections.contains(&s) {
            relevant_sections.push(s);
        }
    }

    let sentences = split_sentences(&explanation);
    let summary = sentences
        .iter()
        .take(2)
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();
    let summary = if summary.is_empty() {
        "Legal information provided.".to_string()
    } else {
        summary
    };

    LegacyResponse {
        explanation,
        relevant_sections,
        summary,
        disclaimer: LEGACY_DISCLAIMER.to_string(),
        sources: Vec::new(),
    }
}

/// Split on `.`, `!`, or `?` followed by whitespace, keeping the terminator
/// with its sentence.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            // Consume the whitespace run separating the sentences.
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            sentences.push(std::mem::take(&mut current));
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current);
    }
    sentences
}
