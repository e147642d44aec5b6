//! Outfit history and feedback entries.
//!
//! Both are append-only: created once, never mutated, read back as recency
//! context for the AI suggester.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many history entries go into an AI context snapshot.
pub const HISTORY_CONTEXT_LIMIT: usize = 7;

/// How many feedback entries go into an AI context snapshot.
pub const FEEDBACK_CONTEXT_LIMIT: usize = 10;

/// One suggested outfit, recorded after the AI responded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: DateTime<Utc>,

    /// The occasion/request text the user asked for
    pub occasion: String,

    /// The raw suggestion text, relayed verbatim from the AI
    pub suggestion: String,
}

/// Free-text user feedback ("me gustó el outfit de hoy").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub date: DateTime<Utc>,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_entry_serializes() {
        let entry = HistoryEntry {
            date: Utc::now(),
            occasion: "bar con amigos".into(),
            suggestion: "🔥 Viernes casual".into(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("bar con amigos"));
    }
}
