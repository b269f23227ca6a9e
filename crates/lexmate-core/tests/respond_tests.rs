// Response-format adaptation: adaptive metadata and legacy post-processing.

use lexmate_core::prompts::{DISCLAIMER, LEGACY_DISCLAIMER};
use lexmate_core::respond::{analyze_query_type, response_metadata, to_legacy};

// ── query-type analysis ────────────────────────────────────────────────────

#[test]
fn query_types_cover_the_vocabulary() {
    assert_eq!(analyze_query_type("How to file an FIR?"), "procedural");
    assert_eq!(analyze_query_type("What is Article 21?"), "explanatory");
    assert_eq!(analyze_query_type("Article 14 vs DPSP"), "comparative");
    assert_eq!(analyze_query_type("Give me an example scenario"), "example-based");
    assert_eq!(analyze_query_type("quick overview of bail"), "concise");
    assert_eq!(analyze_query_type("Tell me about fundamental rights"), "comprehensive");
}

// ── adaptive metadata ──────────────────────────────────────────────────────

#[test]
fn metadata_reports_sections_and_word_count() {
    let response = "Article 21 guarantees life and liberty. See Section 65B for records.";
    let meta = response_metadata("What is Article 21?", response);
    assert_eq!(meta["query_type"], "explanatory");
    assert_eq!(meta["has_legal_sections"], true);
    assert_eq!(meta["complexity"], "simple");
    assert_eq!(meta["word_count"], 11);
}

#[test]
fn complexity_tiers_follow_word_count() {
    let simple = "short answer".to_string();
    let moderate = "word ".repeat(150);
    let detailed = "word ".repeat(350);

    assert_eq!(response_metadata("q", &simple)["complexity"], "simple");
    assert_eq!(response_metadata("q", &moderate)["complexity"], "moderate");
    assert_eq!(response_metadata("q", &detailed)["complexity"], "detailed");
}

#[test]
fn plain_text_has_no_legal_sections() {
    let meta = response_metadata("hello", "Hi! How can I help you today?");
    assert_eq!(meta["has_legal_sections"], false);
}

// ── legacy formatting ──────────────────────────────────────────────────────

#[test]
fn legacy_summary_is_first_two_sentences() {
    let answer = "First sentence here. Second sentence follows! Third is dropped? Fourth too.";
    let legacy = to_legacy(answer);
    assert_eq!(legacy.summary, "First sentence here. Second sentence follows!");
}

#[test]
fn legacy_strips_headings_and_disclaimer() {
    let answer = format!(
        "## Analysis\nArticle 21 protects life and liberty.\n\n{DISCLAIMER}"
    );
    let legacy = to_legacy(&answer);
    assert!(!legacy.explanation.contains("## Analysis"));
    assert!(!legacy.explanation.contains(DISCLAIMER));
    assert!(legacy.explanation.contains("Article 21 protects life and liberty."));
    assert_eq!(legacy.disclaimer, LEGACY_DISCLAIMER);
}

#[test]
fn legacy_sections_are_deduplicated() {
    let answer = "Section 65B of the Evidence Act applies. As held, Section 65B of the \
                  Evidence Act applies\nArticle 21 is engaged.";
    let legacy = to_legacy(answer);
    let sixty_five_b: Vec<_> = legacy
        .relevant_sections
        .iter()
        .filter(|s| s.starts_with("Section 65B"))
        .collect();
    assert_eq!(sixty_five_b.len(), 1);
    assert!(legacy
        .relevant_sections
        .iter()
        .any(|s| s.starts_with("Article 21")));
}

#[test]
fn legacy_sources_stay_empty() {
    // RAG sources are not threaded through to the legacy shape.
    let legacy = to_legacy("Section 420 covers cheating.");
    assert!(legacy.sources.is_empty());
}

#[test]
fn empty_explanation_falls_back_to_stock_summary() {
    let legacy = to_legacy(DISCLAIMER);
    assert_eq!(legacy.summary, "Legal information provided.");
}
