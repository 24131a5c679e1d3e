use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Suggestion;

/// Final ranked output of one suggestion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    /// Ranked best first. Never empty, never longer than `max_suggestions`.
    pub suggestions: Vec<Suggestion>,
    /// Mean confidence of `suggestions`; 0.0 when only the fallback answered.
    pub overall_confidence: f64,
    /// Set when every provider came back empty and the fallback answered.
    pub low_confidence: bool,
    pub cache_key: String,
    pub expires_at: DateTime<Utc>,
}

impl AggregatedResult {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn top(&self) -> Option<&Suggestion> {
        self.suggestions.first()
    }
}

/// A persisted cache record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub result: AggregatedResult,
    pub inserted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, result: AggregatedResult) -> Self {
        let expires_at = result.expires_at;
        Self {
            key: key.into(),
            result,
            inserted_at: Utc::now(),
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
