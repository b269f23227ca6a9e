use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::types::{SessionInfo, Turn};

const TITLE_MAX_CHARS: usize = 40;

/// Process-lifetime store of per-session conversation history.
///
/// Explicitly owned and injected (never a hidden global). Appends for one
/// exchange happen under a single lock acquisition, so two concurrent
/// requests on the same session can never interleave a partial turn pair.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Vec<Turn>>>,
}

impl SessionStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions: Mutex::new(HashMap::new()),
        })
    }

    /// Snapshot a session's history, creating the session lazily on first
    /// reference.
    pub async fn history(&self, session_id: &str) -> Vec<Turn> {
        let mut map = self.sessions.lock().await;
        map.entry(session_id.to_string()).or_default().clone()
    }

    /// Append one completed (user, assistant) exchange atomically.
    pub async fn append_exchange(&self, session_id: &str, user: &str, assistant: &str) {
        let mut map = self.sessions.lock().await;
        let turns = map.entry(session_id.to_string()).or_default();
        turns.push(Turn::User(user.to_string()));
        turns.push(Turn::Assistant(assistant.to_string()));
        debug!(session_id, turns = turns.len(), "exchange recorded");
    }

    /// List all sessions with derived titles: the first user turn truncated
    /// to 40 chars, or a short-id fallback for empty sessions.
    pub async fn sessions_with_titles(&self) -> Vec<SessionInfo> {
        let map = self.sessions.lock().await;
        map.iter()
            .map(|(id, turns)| SessionInfo {
                id: id.clone(),
                title: derive_title(id, turns),
            })
            .collect()
    }

    /// A session's turns, or `None` if the session was never created.
    pub async fn messages(&self, session_id: &str) -> Option<Vec<Turn>> {
        let map = self.sessions.lock().await;
        map.get(session_id).cloned()
    }

    /// Remove a session entirely. Returns false if it did not exist.
    pub async fn delete(&self, session_id: &str) -> bool {
        let mut map = self.sessions.lock().await;
        map.remove(session_id).is_some()
    }

    /// Clear a session's turns but keep the session referenceable.
    /// Returns false if it did not exist.
    pub async fn clear(&self, session_id: &str) -> bool {
        let mut map = self.sessions.lock().await;
        match map.get_mut(session_id) {
            Some(turns) => {
                turns.clear();
                true
            }
            None => false,
        }
    }

    /// Drop every session.
    pub async fn clear_all(&self) {
        let mut map = self.sessions.lock().await;
        map.clear();
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

fn derive_title(session_id: &str, turns: &[Turn]) -> String {
    for turn in turns {
        if let Turn::User(text) = turn {
            if text.is_empty() {
                continue;
            }
            return if text.chars().count() > TITLE_MAX_CHARS {
                let truncated: String = text.chars().take(TITLE_MAX_CHARS).collect();
                format!("{truncated}...")
            } else {
                text.clone()
            };
        }
    }
    let short: String = session_id.chars().take(8).collect();
    format!("Chat {short}...")
}
