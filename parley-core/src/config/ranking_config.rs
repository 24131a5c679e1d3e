use serde::{Deserialize, Serialize};

use super::defaults;

/// Aggregation and ranking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Confidence increment per additional provider agreeing on a suggestion.
    pub consensus_boost: f64,
    /// Weight (alpha) of context relevance in the blended score.
    pub relevance_weight: f64,
    /// Score bonus for personality-sourced items when alignment is high.
    pub personality_boost: f64,
    /// Alignment score above which the personality boost applies.
    pub alignment_threshold: f64,
    /// Confidence assigned to rule-based fallback suggestions.
    pub fallback_confidence: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            consensus_boost: defaults::DEFAULT_CONSENSUS_BOOST,
            relevance_weight: defaults::DEFAULT_RELEVANCE_WEIGHT,
            personality_boost: defaults::DEFAULT_PERSONALITY_BOOST,
            alignment_threshold: defaults::DEFAULT_ALIGNMENT_THRESHOLD,
            fallback_confidence: defaults::DEFAULT_FALLBACK_CONFIDENCE,
        }
    }
}
