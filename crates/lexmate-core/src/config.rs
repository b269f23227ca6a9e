use std::collections::HashMap;

use anyhow::Result;

/// Service configuration. Comes from env vars with a `.env` fallback; no
/// caller credentials live here (API keys arrive per request).
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub port: u16,

    // Language model
    pub gemini_base_url: String,
    pub gemini_model: String,

    // Retrieval (Cohere embeddings + Chroma vector store)
    pub chroma_url: String,
    pub chroma_collection: String,
    pub cohere_embed_model: String,
    pub retrieval_top_k: usize,

    // Web search
    pub web_max_results: usize,

    /// Timeout applied to every outbound provider call, in seconds.
    pub request_timeout_s: u64,
}

fn parse_dotenv() -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return map;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    map
}

fn get(key: &str, dotenv: &HashMap<String, String>) -> Option<String> {
    std::env::var(key).ok().or_else(|| dotenv.get(key).cloned())
}

fn get_str(key: &str, dotenv: &HashMap<String, String>, default: &str) -> String {
    get(key, dotenv).unwrap_or_else(|| default.to_string())
}

fn get_u64(key: &str, dotenv: &HashMap<String, String>, default: u64) -> u64 {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let dotenv = parse_dotenv();
        Ok(Self {
            bind: get_str("BIND", &dotenv, "0.0.0.0"),
            port: get_u64("PORT", &dotenv, 8080) as u16,
            gemini_base_url: get_str(
                "GEMINI_BASE_URL",
                &dotenv,
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            gemini_model: get_str("GEMINI_MODEL", &dotenv, "gemini-2.5-flash"),
            chroma_url: get_str("CHROMA_URL", &dotenv, "http://localhost:8000"),
            chroma_collection: get_str("CHROMA_COLLECTION", &dotenv, "legal_documents"),
            cohere_embed_model: get_str("COHERE_EMBED_MODEL", &dotenv, "embed-english-v3.0"),
            retrieval_top_k: get_u64("RETRIEVAL_TOP_K", &dotenv, 5) as usize,
            web_max_results: get_u64("WEB_MAX_RESULTS", &dotenv, 3) as usize,
            request_timeout_s: get_u64("REQUEST_TIMEOUT_S", &dotenv, 60),
        })
    }
}
